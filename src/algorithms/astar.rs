//! A* search guided by the distance to the destination.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::search::Generation;
use crate::search::SearchTree;
use crate::search::State;
use crate::search::StateIndex;
use crate::search::StateSet;
use crate::solver::PathSolver;
use crate::solver::SearchLimits;
use crate::solver::SearchOutcome;

/// The ranking tuple for A*
///
/// We prefer better f-values, and tie break for lower h, then for older
/// nodes so runs are deterministic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct AStarRank {
    f: Generation,
    h: Generation,
    order: usize,
}

impl AStarRank {
    pub fn new(g: Generation, h: Generation, order: usize) -> Self {
        Self {
            f: g.saturating_add(h),
            h,
            order,
        }
    }

    pub fn f(&self) -> Generation {
        self.f
    }
}

#[derive(Debug)]
pub struct AStarHeapNode {
    /// The rank of this node that defines how good it is.
    pub rank: AStarRank,
    /// The index of this node in the search tree. Ignored when ranking.
    pub node_index: StateIndex,
}

impl PartialEq for AStarHeapNode {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.rank.eq(&other.rank)
    }
}
impl Eq for AStarHeapNode {}

impl PartialOrd for AStarHeapNode {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for AStarHeapNode {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank.cmp(&other.rank)
    }
}

/// Best-first search on `generation + distance`.
///
/// The distance is a Manhattan distance to the destination, and goals sit at
/// distance 1. Every f-value is therefore shifted by the same 1 from an
/// admissible and consistent estimate, which keeps the first goal expanded
/// at the lowest generation.
#[derive(Debug, Default)]
pub struct AStarSolver {
    limits: SearchLimits,
}

impl AStarSolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_limits(limits: SearchLimits) -> Self {
        Self { limits }
    }
}

/// The open set. A state may be queued more than once, copies left behind
/// are dropped when popped after the state is closed.
struct Open {
    heap: BinaryHeap<Reverse<AStarHeapNode>>,
    pushed: usize,
}

impl Open {
    fn new() -> Self {
        Self {
            heap: BinaryHeap::with_capacity(1024),
            pushed: 0,
        }
    }

    fn push(&mut self, tree: &SearchTree, node_index: StateIndex) {
        let state = &tree[node_index];
        let rank = AStarRank::new(state.generation(), state.distance(), self.pushed);
        self.pushed += 1;
        self.heap.push(Reverse(AStarHeapNode { rank, node_index }));
    }

    fn pop(&mut self) -> Option<StateIndex> {
        self.heap.pop().map(|Reverse(n)| n.node_index)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

impl PathSolver for AStarSolver {
    fn name(&self) -> &'static str {
        "A*"
    }

    fn search(
        &mut self,
        tree: &mut SearchTree,
        root: StateIndex,
        on_expand: &mut dyn FnMut(&State),
    ) -> SearchOutcome {
        let mut open = Open::new();
        let mut closed = StateSet::new();
        let mut iterations = 0usize;
        open.push(tree, root);

        while let Some(index) = open.pop() {
            if !closed.insert(tree, index) {
                log::trace!("Skipping closed {:?}", tree[index]);
                continue;
            }
            if self.limits.exhausted(iterations) {
                log::warn!("A* gave up after {iterations} iterations");
                return SearchOutcome::NotFound;
            }
            iterations += 1;
            on_expand(&tree[index]);

            if tree[index].is_goal() {
                return SearchOutcome::Found {
                    terminal: index,
                    iterations,
                    explored: open.len() + closed.len(),
                };
            }

            for child in tree.children(index) {
                if !closed.contains(tree, child) {
                    open.push(tree, child);
                }
            }
        }

        SearchOutcome::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;

    use crate::problems::maze::Coord;
    use crate::problems::maze::Maze;

    fn solve(text: &str) -> crate::solver::SearchResult {
        AStarSolver::new().solve(State::root(Maze::try_from(text).unwrap()), false)
    }

    #[test]
    fn ranking() {
        let (g, h_low, h_high) = (2, 0, 1);
        assert!(AStarRank::new(g, h_low, 0) < AStarRank::new(g, h_high, 0));
        assert!(AStarRank::new(g, h_high, 0) == AStarRank::new(g, h_high, 0));
        assert!(AStarRank::new(g, h_high, 0) > AStarRank::new(g, h_low, 0));

        // Same f-value, needs tie-breaking on h
        let low = AStarRank::new(2, 0, 1);
        let high = AStarRank::new(0, 2, 0);
        assert!(low < high);
        assert!(low.f() == high.f());

        // Same f and h, older first
        assert!(AStarRank::new(1, 1, 0) < AStarRank::new(1, 1, 1));
    }

    #[test]
    fn open_room() {
        let result = solve(indoc! {"
            %%%%%
            %s  %
            %   %
            %  d%
            %%%%%
        "});

        let terminal = result.terminal().unwrap();
        assert_eq!(terminal.generation(), 3);
        assert_eq!(terminal.maze().selected(), Coord::new(3, 2));
        // Heads straight down the first branch.
        assert_eq!(result.iterations(), Some(4));
        // Four states closed, (1,2) and (2,2) left open.
        assert_eq!(result.explored_count(), Some(6));
    }

    #[test]
    fn walled_off_destination() {
        let result = solve(indoc! {"
            %%%%%%%
            %s    %
            %   %%%
            %   %d%
            %%%%%%%
        "});
        assert!(!result.is_found());
        assert_eq!(result.explored_count(), None);
    }

    #[test]
    fn skips_stale_duplicates() {
        // The distance pulls the search into the room, where snaking walks
        // queue the same state twice before the way out is found.
        let result = solve(indoc! {"
            %%%%%%%
            %s  % %
            %   %d%
            %   % %
            %%% % %
            %%% % %
            %%%   %
            %%%%%%%
        "});
        let terminal = result.terminal().unwrap();
        assert_eq!(terminal.maze().selected(), Coord::new(3, 5));
        assert_eq!(terminal.generation(), 12);
        assert_eq!(result.iterations(), Some(102));
        // Stale copies still in the heap count as open.
        assert_eq!(result.explored_count(), Some(112));
        assert_eq!(result.tree().len(), 116);
    }

    #[test]
    fn takes_the_long_way_round() {
        // The inner room only opens at the bottom left.
        let result = solve(indoc! {"
            %%%%%%%%%
            %       %
            % %%%%% %
            % %   % %
            % % d % %
            %   % % %
            %%%%%%s %
            %%%%%%%%%
        "});
        let terminal = result.terminal().unwrap();
        assert!(terminal.is_goal());
        assert_eq!(terminal.maze().selected(), Coord::new(4, 3));
        assert_eq!(terminal.generation(), 19);
    }
}
