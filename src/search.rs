//! Search nodes and the arena that owns them.
//!
//! Each node owns a full snapshot of the maze. Nodes live in a `SearchTree`
//! and refer to their parent by index, so parent links never keep anything
//! alive and never form ownership cycles.

use std::hash::Hash;
use std::hash::Hasher;

use nonmax::NonMaxUsize;
use rustc_hash::FxHashMap;
use rustc_hash::FxHasher;
use smallvec::SmallVec;

use crate::problems::maze::CoordIntrinsic;
use crate::problems::maze::MOVEMENT;
use crate::problems::maze::Maze;

/// Depth of a node, the number of moves from the root.
pub type Generation = CoordIntrinsic;

/// A reference to a `State` in a `SearchTree`.
///
/// `Option<StateIndex>` is as wide as a `usize`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateIndex {
    index: NonMaxUsize,
}

impl StateIndex {
    #[inline(always)]
    fn new(index: usize) -> Self {
        match NonMaxUsize::new(index) {
            Some(index) => Self { index },
            None => unreachable!("The search tree can't hold usize::MAX states"),
        }
    }

    #[inline(always)]
    pub fn get(&self) -> usize {
        self.index.get()
    }
}

pub type Children = SmallVec<[StateIndex; 4]>;

/// A search node.
///
/// Two states are the same search state when their mazes are equal, no
/// matter how they were reached.
#[derive(Clone)]
pub struct State {
    maze: Maze,
    parent: Option<StateIndex>,
    generation: Generation,
    /// Successors, computed on first access.
    children: Option<Children>,
}

impl State {
    /// A root node for `maze`.
    pub fn root(maze: Maze) -> Self {
        Self::new(maze, None)
    }

    fn new(maze: Maze, parent: Option<(StateIndex, Generation)>) -> Self {
        Self {
            maze,
            parent: parent.map(|(index, _)| index),
            generation: parent.map(|(_, g)| g + 1).unwrap_or(0),
            children: None,
        }
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }
    pub fn parent(&self) -> Option<StateIndex> {
        self.parent
    }
    pub fn generation(&self) -> Generation {
        self.generation
    }
    pub fn is_expanded(&self) -> bool {
        self.children.is_some()
    }

    /// Manhattan distance from the selection to the destination.
    #[inline(always)]
    pub fn distance(&self) -> Generation {
        self.maze.selection_distance()
    }

    /// The A* f-value, `generation + distance`.
    #[inline(always)]
    pub fn evaluation(&self) -> Generation {
        self.generation.saturating_add(self.distance())
    }

    #[inline(always)]
    pub fn is_goal(&self) -> bool {
        self.maze.is_goal()
    }

    /// Bytes held by a state for `maze`: the node and its grid snapshot.
    pub fn memory_size(maze: &Maze) -> usize {
        std::mem::size_of::<State>() + std::mem::size_of_val(maze.kinds())
    }

    fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.maze == other.maze
    }
}
impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.maze.hash(state);
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Generation: {}, Distance: {}, F: {}",
            self.generation,
            self.distance(),
            self.evaluation()
        )
    }
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "State{{{:?}, g:{}, h:{}, parent:{:?}}}",
            self.maze,
            self.generation,
            self.distance(),
            self.parent.map(|p| p.get())
        )
    }
}

/// All the states created by a search. Only grows.
#[derive(Default)]
pub struct SearchTree {
    nodes: Vec<State>,
}

impl SearchTree {
    #[inline(always)]
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: vec![] }
    }

    #[inline(always)]
    pub fn push(&mut self, state: State) -> StateIndex {
        let index = StateIndex::new(self.nodes.len());
        self.nodes.push(state);
        index
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The successors of a state, creating them on first access.
    ///
    /// A successor moves the selection once in each direction of the
    /// movement model, in order. Moves that fail, or that would recreate the
    /// parent's maze, are dropped.
    pub fn children(&mut self, index: StateIndex) -> Children {
        if let Some(children) = &self[index].children {
            return children.clone();
        }

        let mut children = Children::new();
        let generation = self[index].generation;
        for direction in MOVEMENT {
            let child_maze = {
                let state = &self[index];
                if !state.maze.can_move(direction) {
                    continue;
                }
                let mut maze = state.maze.clone();
                maze.move_selection(direction);
                if maze.selected() == state.maze.selected() {
                    continue;
                }
                if let Some(parent) = state.parent {
                    if self[parent].maze == maze {
                        continue;
                    }
                }
                maze
            };
            children.push(self.push(State::new(child_maze, Some((index, generation)))));
        }

        self[index].children = Some(children.clone());
        children
    }

    /// The states from `index` back to the root, both included.
    #[must_use]
    pub fn path(&self, mut index: StateIndex) -> Vec<StateIndex> {
        let mut path = vec![index];
        while let Some(parent) = self[index].parent {
            debug_assert!(parent != index);
            path.push(parent);
            index = parent;
        }
        path
    }

    /// Bytes used by one state: the node itself and its maze snapshot.
    pub fn state_size(&self) -> usize {
        self.nodes
            .first()
            .map(|s| State::memory_size(&s.maze))
            .unwrap_or(std::mem::size_of::<State>())
    }

    pub fn write_memory_stats<W: std::io::Write>(&self, mut out: W) -> std::io::Result<()> {
        use size::Size;
        use thousands::Separable;

        writeln!(out, "SearchTree Stats:")?;
        let s = self.state_size();
        let l = self.len();
        writeln!(
            out,
            "  - |States|: {} ({} each)",
            l.separate_with_commas(),
            Size::from_bytes(s)
        )?;
        writeln!(out, "  - Total:    {}", Size::from_bytes(l * s))?;

        let expanded = self.nodes.iter().filter(|s| s.is_expanded()).count();
        writeln!(
            out,
            "  - Expanded states: {}",
            expanded.separate_with_commas()
        )?;

        Ok(())
    }
}

impl std::ops::Index<StateIndex> for SearchTree {
    type Output = State;

    #[inline(always)]
    fn index(&self, index: StateIndex) -> &Self::Output {
        &self.nodes[index.get()]
    }
}

impl std::ops::IndexMut<StateIndex> for SearchTree {
    #[inline(always)]
    fn index_mut(&mut self, index: StateIndex) -> &mut State {
        &mut self.nodes[index.get()]
    }
}

impl std::fmt::Debug for SearchTree {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "SearchTree{{({} states)}}", self.len())
    }
}

/// A set of states from a `SearchTree`, keyed by their maze.
///
/// States are stored by index and compared through the tree, so membership
/// doesn't need another copy of each maze.
#[derive(Debug, Default)]
pub struct StateSet {
    buckets: FxHashMap<u64, SmallVec<[StateIndex; 1]>>,
    len: usize,
}

impl StateSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, tree: &SearchTree, index: StateIndex) -> bool {
        let state = &tree[index];
        match self.buckets.get(&state.fingerprint()) {
            Some(bucket) => bucket.iter().any(|i| tree[*i] == *state),
            None => false,
        }
    }

    /// Adds a state, returning whether it was new.
    pub fn insert(&mut self, tree: &SearchTree, index: StateIndex) -> bool {
        let state = &tree[index];
        let bucket = self.buckets.entry(state.fingerprint()).or_default();
        if bucket.iter().any(|i| tree[*i] == *state) {
            return false;
        }
        bucket.push(index);
        self.len += 1;
        true
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
