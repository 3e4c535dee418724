//! The interface shared by path solvers and what they report back.

use derive_more::Display;

use crate::algorithms::astar::AStarSolver;
use crate::algorithms::bfs::BfsSolver;
use crate::problems::maze::Coord;
use crate::search::SearchTree;
use crate::search::State;
use crate::search::StateIndex;

/// How a search ended.
///
/// Not finding a path is a regular outcome, not an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Found {
        terminal: StateIndex,
        /// Expanded states, the goal included.
        iterations: usize,
        /// Size of the frontier plus the expanded set when the goal was found.
        explored: usize,
    },
    NotFound,
}

/// Optional budget for a search.
///
/// A search that runs out of budget reports `SearchOutcome::NotFound`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_iterations: Option<usize>,
}

impl SearchLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(max_iterations: usize) -> Self {
        Self {
            max_iterations: Some(max_iterations),
        }
    }

    /// Whether `iterations` expansions already used up the budget.
    #[inline(always)]
    pub fn exhausted(&self, iterations: usize) -> bool {
        self.max_iterations.is_some_and(|max| iterations >= max)
    }
}

/// A finished search: the states it created and how it ended.
pub struct SearchResult {
    tree: SearchTree,
    outcome: SearchOutcome,
}

impl SearchResult {
    pub fn new(tree: SearchTree, outcome: SearchOutcome) -> Self {
        Self { tree, outcome }
    }

    pub fn outcome(&self) -> SearchOutcome {
        self.outcome
    }
    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }

    pub fn is_found(&self) -> bool {
        matches!(self.outcome, SearchOutcome::Found { .. })
    }

    pub fn terminal(&self) -> Option<&State> {
        match self.outcome {
            SearchOutcome::Found { terminal, .. } => Some(&self.tree[terminal]),
            SearchOutcome::NotFound => None,
        }
    }

    pub fn iterations(&self) -> Option<usize> {
        match self.outcome {
            SearchOutcome::Found { iterations, .. } => Some(iterations),
            SearchOutcome::NotFound => None,
        }
    }

    pub fn explored_count(&self) -> Option<usize> {
        match self.outcome {
            SearchOutcome::Found { explored, .. } => Some(explored),
            SearchOutcome::NotFound => None,
        }
    }

    /// States from the terminal back to the root. Empty without a path.
    pub fn path(&self) -> Vec<&State> {
        match self.outcome {
            SearchOutcome::Found { terminal, .. } => self
                .tree
                .path(terminal)
                .into_iter()
                .map(|i| &self.tree[i])
                .collect(),
            SearchOutcome::NotFound => vec![],
        }
    }

    /// Positions of the selection from the root to the terminal.
    pub fn path_coords(&self) -> Vec<Coord> {
        let mut coords: Vec<Coord> = self.path().iter().map(|s| s.maze().selected()).collect();
        coords.reverse();
        coords
    }

    pub fn write_memory_stats<W: std::io::Write>(&self, out: W) -> std::io::Result<()> {
        self.tree.write_memory_stats(out)
    }
    pub fn print_memory_stats(&self) -> std::io::Result<()> {
        self.write_memory_stats(std::io::stdout().lock())
    }
}

impl std::fmt::Display for SearchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.outcome {
            SearchOutcome::Found {
                terminal,
                iterations,
                explored,
            } => {
                let state = &self.tree[terminal];
                write!(
                    f,
                    "Found({} at generation {}, {iterations} iterations, {explored} explored)",
                    state.maze().selected(),
                    state.generation(),
                )
            }
            SearchOutcome::NotFound => write!(f, "NotFound"),
        }
    }
}

impl std::fmt::Debug for SearchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "SearchResult{{{:?}, {:?}}}", self.outcome, self.tree)
    }
}

/// A strategy to find a path from the root state to a goal state.
pub trait PathSolver {
    fn name(&self) -> &'static str;

    /// Expands states of `tree` from `root` until reaching a goal, handing
    /// each expanded state to `on_expand` first.
    fn search(
        &mut self,
        tree: &mut SearchTree,
        root: StateIndex,
        on_expand: &mut dyn FnMut(&State),
    ) -> SearchOutcome;

    /// Solves from `root`, reporting every expanded state to `on_expand`.
    fn solve_observed(&mut self, root: State, on_expand: &mut dyn FnMut(&State)) -> SearchResult {
        let mut tree = SearchTree::new();
        let root = tree.push(root);

        log::debug!("{} search from {:?}", self.name(), tree[root]);
        let outcome = self.search(&mut tree, root, on_expand);
        let result = SearchResult::new(tree, outcome);
        log::debug!("{} search finished: {result}", self.name());

        result
    }

    /// Solves from `root`. When `verbose`, logs the rendering of every
    /// expanded state at debug level, so it only shows up with a logger
    /// enabled for it. Use `solve_observed` to print them instead.
    fn solve(&mut self, root: State, verbose: bool) -> SearchResult {
        if verbose {
            self.solve_observed(root, &mut |s: &State| {
                log::debug!("Expanding {s}\n{}", s.maze());
            })
        } else {
            self.solve_observed(root, &mut |_: &State| {})
        }
    }
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, clap::ValueEnum)]
pub enum Strategy {
    /// Breadth-first search
    #[display("BFS")]
    Bfs,
    /// A* guided by Manhattan distance
    #[display("A*")]
    #[value(name = "astar", alias = "a*")]
    AStar,
}

impl Strategy {
    pub fn solver(self, limits: SearchLimits) -> Box<dyn PathSolver> {
        match self {
            Strategy::Bfs => Box::new(BfsSolver::with_limits(limits)),
            Strategy::AStar => Box::new(AStarSolver::with_limits(limits)),
        }
    }
}
