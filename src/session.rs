//! Command and query boundary over the core.
//!
//! A [`Session`] owns the grid, the run in progress and the metrics of the last completed search.
//! Controllers issue commands, call [`Session::step`] at their own pace and redraw from
//! [`Session::grid`] between steps.

use std::mem;

use rand::{rngs::StdRng, SeedableRng as _};

use crate::{
    error::{Error, Result},
    grid::{CellState, Grid, Position, Role},
    maze::{GenerationStep, MazeGeneration},
    search::{Algorithm, Metrics, Search, Step},
};

/// Density a new session starts with.
pub const DEFAULT_DENSITY: f64 = 0.65;

/// Lowest density reachable through [`Session::adjust_density`].
pub const MIN_DENSITY: f64 = 0.1;

/// Highest density reachable through [`Session::adjust_density`].
pub const MAX_DENSITY: f64 = 0.9;

/// Work currently in progress.
#[derive(Debug)]
enum Activity {
    /// Nothing is running.
    Idle,
    /// A search run is in progress.
    Searching(Search),
    /// A maze is being generated.
    Generating(MazeGeneration<StdRng>),
}

/// Result of a single call to [`Session::step`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionStep {
    /// The active search advanced.
    Search(Step),
    /// The active maze generation advanced.
    Maze(GenerationStep),
    /// Nothing was running.
    Idle,
}

/// A grid together with the run being performed on it.
#[derive(Debug)]
pub struct Session {
    /// Grid every command operates on.
    grid: Grid,
    /// Whether searches may move diagonally.
    diagonal: bool,
    /// Algorithm used by [`Session::run_selected`].
    algorithm: Algorithm,
    /// Density used by [`Session::generate_selected`].
    density: f64,
    /// Source of every maze's randomness.
    rng: StdRng,
    /// Run in progress.
    activity: Activity,
    /// Metrics of the last completed search.
    metrics: Option<Metrics>,
}

impl Session {
    /// Creates a session over an empty grid of side `size`.
    ///
    /// Mazes are reproducible when a `seed` is given; otherwise the generator is seeded from the
    /// operating system.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSize`] when `size` is zero.
    pub fn new(size: usize, seed: Option<u64>) -> Result<Self> {
        let rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

        Ok(Self {
            grid: Grid::new(size)?,
            diagonal: false,
            algorithm: Algorithm::default(),
            density: DEFAULT_DENSITY,
            rng,
            activity: Activity::Idle,
            metrics: None,
        })
    }

    /// Read access to the grid, for rendering.
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// State of the cell at `(row, col)`, or `None` when out of bounds.
    pub fn cell_at(&self, row: usize, col: usize) -> Option<CellState> {
        self.grid.cell_at(row, col)
    }

    /// Metrics of the last completed search, if any.
    pub const fn metrics(&self) -> Option<Metrics> {
        self.metrics
    }

    /// Whether searches move diagonally.
    pub const fn diagonal(&self) -> bool {
        self.diagonal
    }

    /// Algorithm selected for the next run.
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Density selected for the next maze.
    pub const fn density(&self) -> f64 {
        self.density
    }

    /// Returns whether a search or a maze generation is in progress.
    pub const fn is_busy(&self) -> bool {
        !matches!(self.activity, Activity::Idle)
    }

    /// Returns whether a search is in progress.
    pub const fn is_searching(&self) -> bool {
        matches!(self.activity, Activity::Searching(_))
    }

    /// Returns whether a maze generation is in progress.
    pub const fn is_generating(&self) -> bool {
        matches!(self.activity, Activity::Generating(_))
    }

    /// Assigns `role` to the cell at `position`, cancelling any run first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPlacement`] when the position is out of bounds or the role conflicts
    /// with the cell's current one. The grid is left untouched in that case.
    pub fn place(&mut self, position: Position, role: Role) -> Result<()> {
        self.cancel();
        self.grid.place(position, role)
    }

    /// Turns the cell at `position` back into an empty cell, cancelling any run first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPlacement`] when the position is out of bounds.
    pub fn clear(&mut self, position: Position) -> Result<()> {
        self.cancel();
        self.grid.clear(position)
    }

    /// Selects the movement mode of the next run. A run in progress keeps its own mode.
    pub fn set_diagonal(&mut self, diagonal: bool) {
        self.diagonal = diagonal;
    }

    /// Flips the movement mode and returns the new one.
    pub fn toggle_diagonal(&mut self) -> bool {
        self.diagonal = !self.diagonal;
        self.diagonal
    }

    /// Selects the algorithm of the next run.
    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
    }

    /// Selects the following algorithm and returns it.
    pub fn cycle_algorithm(&mut self) -> Algorithm {
        self.algorithm = self.algorithm.next();
        self.algorithm
    }

    /// Selects the density of the next maze.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDensity`] unless `0 < density < 1`.
    pub fn set_density(&mut self, density: f64) -> Result<()> {
        if !(density > 0.0 && density < 1.0) {
            return Err(Error::InvalidDensity(density));
        }
        self.density = density;
        Ok(())
    }

    /// Shifts the maze density by `delta`, clamped to [`MIN_DENSITY`]..=[`MAX_DENSITY`], and returns
    /// the new value.
    pub fn adjust_density(&mut self, delta: f64) -> f64 {
        self.density = (self.density + delta).clamp(MIN_DENSITY, MAX_DENSITY);
        self.density
    }

    /// Starts a stepwise search with `algorithm`, cancelling any run first.
    ///
    /// Coloring left by earlier runs is cleared while the endpoints and barriers stay in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingEndpoints`] when the start or the end is not placed. Nothing changes
    /// in that case.
    pub fn run_search(&mut self, algorithm: Algorithm) -> Result<()> {
        if self.grid.start().is_none() || self.grid.end().is_none() {
            return Err(Error::MissingEndpoints);
        }

        self.cancel();
        self.grid.clear_search();
        self.algorithm = algorithm;
        self.metrics = None;

        let search = Search::new(&mut self.grid, algorithm, self.diagonal)?;
        self.activity = Activity::Searching(search);

        Ok(())
    }

    /// Starts a stepwise search with the selected algorithm.
    ///
    /// # Errors
    ///
    /// See [`Session::run_search`].
    pub fn run_selected(&mut self) -> Result<()> {
        self.run_search(self.algorithm)
    }

    /// Starts a stepwise maze generation, cancelling any run first.
    ///
    /// The generation wipes the grid, endpoints included, on its first step.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDensity`] unless `0 < density < 1`. Nothing changes in that case.
    pub fn generate_maze(&mut self, density: f64) -> Result<()> {
        let generation = MazeGeneration::new(density, StdRng::from_rng(&mut self.rng))?;

        self.cancel();
        self.metrics = None;
        self.activity = Activity::Generating(generation);

        Ok(())
    }

    /// Starts a stepwise maze generation at the selected density.
    ///
    /// # Errors
    ///
    /// See [`Session::generate_maze`].
    pub fn generate_selected(&mut self) -> Result<()> {
        self.generate_maze(self.density)
    }

    /// Resets the grid, cancelling any run first. See [`Grid::reset`].
    pub fn reset(&mut self, keep_barriers: bool) {
        self.cancel();
        self.grid.reset(keep_barriers);
        self.metrics = None;
    }

    /// Replaces the grid with an empty one of side `size`, cancelling any run first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSize`] when `size` is zero. The current grid is kept in that case.
    pub fn resize(&mut self, size: usize) -> Result<()> {
        let grid = Grid::new(size)?;

        self.cancel();
        self.grid = grid;
        self.metrics = None;

        Ok(())
    }

    /// Performs one unit of the work in progress.
    ///
    /// A finished search records its metrics and a finished generation returns the session to idle.
    pub fn step(&mut self) -> SessionStep {
        match &mut self.activity {
            Activity::Idle => SessionStep::Idle,
            Activity::Searching(search) => {
                let step = search.step(&mut self.grid);
                if let Step::Finished(outcome) = &step {
                    self.metrics = Some(outcome.metrics());
                    self.activity = Activity::Idle;
                }
                SessionStep::Search(step)
            }
            Activity::Generating(generation) => match generation.step(&mut self.grid) {
                Some(step) => {
                    if generation.is_done() {
                        self.activity = Activity::Idle;
                    }
                    SessionStep::Maze(step)
                }
                None => {
                    self.activity = Activity::Idle;
                    SessionStep::Idle
                }
            },
        }
    }

    /// Abandons the work in progress, if any.
    ///
    /// The grid keeps whatever the run produced so far; a cancelled search also drops its cost and
    /// parent fields.
    pub fn cancel(&mut self) {
        match mem::replace(&mut self.activity, Activity::Idle) {
            Activity::Idle => {}
            Activity::Searching(search) => search.cancel(&mut self.grid),
            Activity::Generating(generation) => {
                log::debug!(
                    "cancelled maze generation at density {:.2}",
                    generation.density()
                );
            }
        }
    }
}
