//! Search engine module.
//!
//! This module contains the four search strategies sharing one stepwise contract: A*, Dijkstra,
//! breadth-first and depth-first search. A run is created with [`Search::new`] and advanced one node
//! expansion at a time with [`Search::step`], so a renderer can redraw the grid between expansions.
//! Every edge costs one.

use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashSet, VecDeque},
    fmt,
    str::FromStr,
    time::{Duration, Instant},
};

use crate::{
    error::{Error, Result},
    grid::{Cell, CellState, Grid, Position},
    path,
};

/// Search strategy selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// A* with a Manhattan or Chebyshev heuristic.
    #[default]
    AStar,
    /// Dijkstra's algorithm, A* with a zero heuristic.
    Dijkstra,
    /// Breadth-first search over a FIFO queue.
    Bfs,
    /// Depth-first search over a LIFO stack.
    Dfs,
}

impl Algorithm {
    /// Every algorithm, in selector order.
    pub const ALL: [Self; 4] = [Self::AStar, Self::Dijkstra, Self::Bfs, Self::Dfs];

    /// Returns the algorithm following this one in selector order, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::AStar => Self::Dijkstra,
            Self::Dijkstra => Self::Bfs,
            Self::Bfs => Self::Dfs,
            Self::Dfs => Self::AStar,
        }
    }

    /// Display name of the algorithm.
    pub const fn repr(self) -> &'static str {
        match self {
            Self::AStar => "A*",
            Self::Dijkstra => "Dijkstra",
            Self::Bfs => "BFS",
            Self::Dfs => "DFS",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.repr())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "astar" | "a*" | "a-star" => Ok(Self::AStar),
            "dijkstra" => Ok(Self::Dijkstra),
            "bfs" => Ok(Self::Bfs),
            "dfs" => Ok(Self::Dfs),
            _ => Err(Error::UnknownAlgorithm(tag.to_owned())),
        }
    }
}

/// Figures reported after a completed run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Metrics {
    /// Distinct cells discovered by the run, the start excluded.
    pub nodes_visited: usize,
    /// Edges along the winning path, zero when no path was found.
    pub path_length: usize,
    /// Time spent computing, pacing between steps excluded.
    pub elapsed: Duration,
}

/// Result of a completed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The end cell was dequeued.
    Found {
        /// Positions from start to end, both included.
        path: Vec<Position>,
        /// Distinct cells discovered, the start excluded.
        nodes_visited: usize,
        /// Edges along the path.
        path_length: usize,
        /// Time spent computing.
        elapsed: Duration,
    },
    /// The frontier emptied without reaching the end cell.
    NotFound {
        /// Distinct cells discovered, the start excluded.
        nodes_visited: usize,
        /// Time spent computing.
        elapsed: Duration,
    },
}

impl Outcome {
    /// Returns whether a path was found.
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// Edges along the winning path, zero when none was found.
    pub const fn path_length(&self) -> usize {
        match self {
            Self::Found { path_length, .. } => *path_length,
            Self::NotFound { .. } => 0,
        }
    }

    /// Summarizes the outcome as [`Metrics`].
    pub const fn metrics(&self) -> Metrics {
        match self {
            Self::Found {
                nodes_visited,
                path_length,
                elapsed,
                ..
            } => Metrics {
                nodes_visited: *nodes_visited,
                path_length: *path_length,
                elapsed: *elapsed,
            },
            Self::NotFound {
                nodes_visited,
                elapsed,
            } => Metrics {
                nodes_visited: *nodes_visited,
                path_length: 0,
                elapsed: *elapsed,
            },
        }
    }
}

/// Result of a single call to [`Search::step`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// One node was expanded.
    Expanded(Position),
    /// The run is over. Further calls keep returning the same outcome.
    Finished(Outcome),
}

/// Discovered-but-not-expanded cells, ordered per algorithm.
#[derive(Debug)]
enum Frontier {
    /// Min-heap on `(f, insertion sequence)` used by A* and Dijkstra.
    Priority {
        /// Entries as `(f, sequence, cell index)`.
        heap: BinaryHeap<Reverse<(u32, u64, usize)>>,
        /// Next insertion sequence number.
        sequence: u64,
    },
    /// FIFO queue used by breadth-first search.
    Queue(VecDeque<usize>),
    /// LIFO stack used by depth-first search.
    Stack(Vec<usize>),
}

impl Frontier {
    /// Builds the empty frontier matching `algorithm`.
    fn new(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::AStar | Algorithm::Dijkstra => Self::Priority {
                heap: BinaryHeap::new(),
                sequence: 0,
            },
            Algorithm::Bfs => Self::Queue(VecDeque::new()),
            Algorithm::Dfs => Self::Stack(Vec::new()),
        }
    }

    /// Inserts a cell. The priority is ignored by the queue and the stack.
    fn push(&mut self, priority: u32, index: usize) {
        match self {
            Self::Priority { heap, sequence } => {
                heap.push(Reverse((priority, *sequence, index)));
                *sequence += 1;
            }
            Self::Queue(queue) => queue.push_back(index),
            Self::Stack(stack) => stack.push(index),
        }
    }

    /// Removes the next cell to expand.
    fn pop(&mut self) -> Option<usize> {
        match self {
            Self::Priority { heap, .. } => heap.pop().map(|Reverse((_, _, index))| index),
            Self::Queue(queue) => queue.pop_front(),
            Self::Stack(stack) => stack.pop(),
        }
    }
}

/// A single stepwise search run.
///
/// The run owns only its local state: the frontier and the membership sets. Cell coloring, costs and
/// parent links live in the [`Grid`], which is passed to every step. Dropping the run (or calling
/// [`Search::cancel`]) at any step boundary abandons it.
#[derive(Debug)]
pub struct Search {
    /// Strategy driving this run.
    algorithm: Algorithm,
    /// Whether diagonal moves were allowed when neighbors were computed.
    diagonal: bool,
    /// Index of the start cell.
    start: usize,
    /// Index of the end cell.
    end: usize,
    /// Position of the end cell, the heuristic target.
    target: Position,
    /// Cells waiting to be expanded.
    frontier: Frontier,
    /// Cells already expanded.
    closed: HashSet<usize>,
    /// Cells ever pushed onto the frontier, the start included.
    discovered: HashSet<usize>,
    /// Time spent inside the run so far.
    elapsed: Duration,
    /// Final outcome once the run is over.
    outcome: Option<Outcome>,
}

impl Search {
    /// Prepares a run between the grid's start and end cells.
    ///
    /// This recomputes the neighbor lists for the requested diagonal mode, drops any cost and parent
    /// fields left by a previous run and seeds the frontier with the start cell. Cell coloring from
    /// earlier runs is left alone; callers usually invoke [`Grid::clear_search`] first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingEndpoints`] when the start or the end is not placed.
    pub fn new(grid: &mut Grid, algorithm: Algorithm, diagonal: bool) -> Result<Self> {
        let timer = Instant::now();

        let (Some(start), Some(end), Some(origin), Some(target)) = (
            grid.start_index(),
            grid.end_index(),
            grid.start(),
            grid.end(),
        ) else {
            return Err(Error::MissingEndpoints);
        };

        grid.compute_neighbors(diagonal);
        grid.clear_costs();

        let mut search = Self {
            algorithm,
            diagonal,
            start,
            end,
            target,
            frontier: Frontier::new(algorithm),
            closed: HashSet::new(),
            discovered: HashSet::new(),
            elapsed: Duration::ZERO,
            outcome: None,
        };

        let priority = search.heuristic(origin);
        grid.set_costs(start, None, Some(0), Some(priority));
        search.frontier.push(priority, start);
        let _ = search.discovered.insert(start);

        log::debug!("starting {algorithm} search from {origin} to {target} (diagonal: {diagonal})");

        search.elapsed = timer.elapsed();
        Ok(search)
    }

    /// Runs `algorithm` on `grid` to completion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingEndpoints`] when the start or the end is not placed.
    pub fn run(grid: &mut Grid, algorithm: Algorithm, diagonal: bool) -> Result<Outcome> {
        let mut search = Self::new(grid, algorithm, diagonal)?;

        loop {
            if let Step::Finished(outcome) = search.step(grid) {
                return Ok(outcome);
            }
        }
    }

    /// Strategy driving this run.
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Whether diagonal moves are allowed in this run.
    pub const fn diagonal(&self) -> bool {
        self.diagonal
    }

    /// Final outcome, once the run is over.
    pub const fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Distinct cells discovered so far, the start excluded.
    pub fn nodes_visited(&self) -> usize {
        self.discovered.len().saturating_sub(1)
    }

    /// Abandons the run.
    ///
    /// All run-local state is released and the cost and parent fields it wrote are cleared. Start, end
    /// and barrier cells are untouched; open and closed coloring stays until the next reset.
    pub fn cancel(self, grid: &mut Grid) {
        grid.clear_costs();
        log::debug!(
            "cancelled {} search after discovering {} cells",
            self.algorithm,
            self.nodes_visited()
        );
    }

    /// Expands one node.
    ///
    /// Pops the next cell off the frontier. Dequeuing the end cell finishes the run with
    /// [`Outcome::Found`] and marks the path; an empty frontier finishes it with
    /// [`Outcome::NotFound`]. Otherwise the cell's neighbors are discovered or relaxed, the cell is
    /// closed and [`Step::Expanded`] is returned.
    pub fn step(&mut self, grid: &mut Grid) -> Step {
        if let Some(outcome) = &self.outcome {
            return Step::Finished(outcome.clone());
        }

        let timer = Instant::now();

        let Some(current) = self.frontier.pop() else {
            self.elapsed += timer.elapsed();
            return self.finish(Outcome::NotFound {
                nodes_visited: self.nodes_visited(),
                elapsed: self.elapsed,
            });
        };

        if current == self.end {
            let reconstruction = path::reconstruct(grid, self.target);
            self.elapsed += timer.elapsed();
            return self.finish(Outcome::Found {
                path: reconstruction.path,
                nodes_visited: self.nodes_visited(),
                path_length: reconstruction.length,
                elapsed: self.elapsed,
            });
        }

        match self.algorithm {
            Algorithm::AStar | Algorithm::Dijkstra => self.relax_neighbors(grid, current),
            Algorithm::Bfs | Algorithm::Dfs => self.discover_neighbors(grid, current),
        }

        if current != self.start {
            let _ = self.closed.insert(current);
            if matches!(
                grid.state_of(current),
                Some(CellState::Open | CellState::Empty)
            ) {
                grid.set_state(current, CellState::Closed);
            }
        }

        self.elapsed += timer.elapsed();

        Step::Expanded(grid.position_of(current).unwrap_or(self.target))
    }

    /// Relaxes every neighbor of `current` through the priority frontier.
    ///
    /// A neighbor whose tentative cost improves gets a new parent, new costs and a fresh frontier
    /// entry, even when an older entry for it is still queued. Stale entries are expanded again when
    /// popped.
    fn relax_neighbors(&mut self, grid: &mut Grid, current: usize) {
        let Some(cell) = grid.cell_by_index(current) else {
            return;
        };
        let tentative = cell.g().unwrap_or(0).saturating_add(1);
        let neighbors = cell.neighbors().to_vec();

        for neighbor in neighbors {
            let known = grid.cell_by_index(neighbor).and_then(Cell::g);
            if known.is_some_and(|cost| tentative >= cost) {
                continue;
            }

            let estimate = grid
                .position_of(neighbor)
                .map_or(0, |position| self.heuristic(position));
            let total = tentative.saturating_add(estimate);
            grid.set_costs(neighbor, Some(current), Some(tentative), Some(total));
            self.frontier.push(total, neighbor);
            let _ = self.discovered.insert(neighbor);
            self.mark_open(grid, neighbor);
        }
    }

    /// Discovers the unvisited neighbors of `current` through the queue or the stack.
    fn discover_neighbors(&mut self, grid: &mut Grid, current: usize) {
        let Some(cell) = grid.cell_by_index(current) else {
            return;
        };
        let depth = cell.g().unwrap_or(0).saturating_add(1);
        let neighbors = cell.neighbors().to_vec();

        for neighbor in neighbors {
            if self.discovered.insert(neighbor) {
                grid.set_costs(neighbor, Some(current), Some(depth), None);
                self.frontier.push(depth, neighbor);
                self.mark_open(grid, neighbor);
            }
        }
    }

    /// Colors a freshly discovered empty cell as open, never reopening a closed one.
    fn mark_open(&self, grid: &mut Grid, index: usize) {
        if grid.state_of(index) == Some(CellState::Empty) && !self.closed.contains(&index) {
            grid.set_state(index, CellState::Open);
        }
    }

    /// Admissible distance estimate from `position` to the end cell.
    ///
    /// Manhattan distance for four-way movement, Chebyshev distance when diagonals are allowed, and
    /// zero for every algorithm but A*.
    fn heuristic(&self, position: Position) -> u32 {
        if self.algorithm != Algorithm::AStar {
            return 0;
        }

        let distance = if self.diagonal {
            position.chebyshev(self.target)
        } else {
            position.manhattan(self.target)
        };

        u32::try_from(distance).unwrap_or(u32::MAX)
    }

    /// Stores the outcome and reports it as the final step.
    fn finish(&mut self, outcome: Outcome) -> Step {
        let metrics = outcome.metrics();
        if outcome.is_found() {
            log::info!(
                "{} found a path of length {} after discovering {} cells in {:?}",
                self.algorithm,
                metrics.path_length,
                metrics.nodes_visited,
                metrics.elapsed
            );
        } else {
            log::info!(
                "{} found no path after discovering {} cells in {:?}",
                self.algorithm,
                metrics.nodes_visited,
                metrics.elapsed
            );
        }

        self.outcome = Some(outcome.clone());
        Step::Finished(outcome)
    }
}
