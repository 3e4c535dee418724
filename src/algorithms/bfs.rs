//! Breadth-first search.

use std::collections::VecDeque;

use crate::search::SearchTree;
use crate::search::State;
use crate::search::StateIndex;
use crate::search::StateSet;
use crate::solver::PathSolver;
use crate::solver::SearchLimits;
use crate::solver::SearchOutcome;

/// Uninformed search expanding states by generation.
///
/// Returns a goal with the lowest generation reachable.
#[derive(Debug, Default)]
pub struct BfsSolver {
    limits: SearchLimits,
}

impl BfsSolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_limits(limits: SearchLimits) -> Self {
        Self { limits }
    }
}

impl PathSolver for BfsSolver {
    fn name(&self) -> &'static str {
        "BFS"
    }

    fn search(
        &mut self,
        tree: &mut SearchTree,
        root: StateIndex,
        on_expand: &mut dyn FnMut(&State),
    ) -> SearchOutcome {
        let mut frontier = VecDeque::<StateIndex>::from([root]);
        let mut visited = StateSet::new();
        let mut iterations = 0usize;

        while let Some(index) = frontier.pop_front() {
            if !visited.insert(tree, index) {
                log::trace!("Skipping visited {:?}", tree[index]);
                continue;
            }
            if self.limits.exhausted(iterations) {
                log::warn!("BFS gave up after {iterations} iterations");
                return SearchOutcome::NotFound;
            }
            iterations += 1;
            on_expand(&tree[index]);

            if tree[index].is_goal() {
                return SearchOutcome::Found {
                    terminal: index,
                    iterations,
                    explored: frontier.len() + visited.len(),
                };
            }

            for child in tree.children(index) {
                if !visited.contains(tree, child) {
                    frontier.push_back(child);
                }
            }
        }

        SearchOutcome::NotFound
    }
}

/// Counts the distinct states reachable from `root`.
///
/// Every state created while counting is kept, duplicates included, so
/// `limit` caps the states stored rather than the ones counted. Returns
/// `None` once more than `limit` states are stored.
pub fn count_reachable_states(root: State, limit: usize) -> Option<usize> {
    let mut tree = SearchTree::new();
    let root = tree.push(root);
    let mut frontier = VecDeque::<StateIndex>::from([root]);
    let mut visited = StateSet::new();

    while let Some(index) = frontier.pop_front() {
        if !visited.insert(&tree, index) {
            continue;
        }
        for child in tree.children(index) {
            if !visited.contains(&tree, child) {
                frontier.push_back(child);
            }
        }
        if tree.len() > limit {
            log::debug!(
                "Gave up counting after storing {} states, {} distinct",
                tree.len(),
                visited.len()
            );
            return None;
        }
    }

    Some(visited.len())
}
