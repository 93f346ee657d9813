//! Maze generation module.
//!
//! This module contains a stepwise recursive-division generator. Walls are not guaranteed to close
//! off regions: each one is placed only with probability equal to the density, the interior is
//! sprinkled with loose barriers beforehand and the corners are partially cleared afterwards. The
//! result is handed to [`ensure_navigable`] for a best-effort connectivity repair.

use std::mem;

use rand::Rng;

use crate::{
    error::{Error, Result},
    grid::{CellState, Grid, Position},
    navigability::{ensure_navigable, RepairReport},
};

/// Scattered barriers appear with probability `density * SCATTER_FACTOR`.
const SCATTER_FACTOR: f64 = 0.3;

/// Probability of clearing each cell of a corner patch.
const CORNER_CLEAR_PROBABILITY: f64 = 0.7;

/// Side length of the square corner patches.
const CORNER_SIZE: usize = 3;

/// Regions with a side shorter than this are not divided.
const MIN_REGION_SIDE: usize = 4;

/// Sub-regions are queued only when the split side exceeds this.
const SPLIT_THRESHOLD: usize = 5;

/// Rectangular area of the grid, in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    /// Top row of the region.
    pub row: usize,
    /// Leftmost column of the region.
    pub col: usize,
    /// Height of the region.
    pub rows: usize,
    /// Width of the region.
    pub cols: usize,
}

/// Direction a dividing wall runs in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// The wall spans a single row.
    Horizontal,
    /// The wall spans a single column.
    Vertical,
}

/// A dividing wall drawn across a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wall {
    /// Region the wall divides.
    pub region: Region,
    /// Direction the wall runs in.
    pub orientation: Orientation,
    /// Row of a horizontal wall or column of a vertical one.
    pub line: usize,
    /// The single cell of the wall left open.
    pub gap: Position,
}

impl Wall {
    /// Every cell the wall covers, the gap included.
    pub fn cells(&self) -> Vec<Position> {
        match self.orientation {
            Orientation::Horizontal => (self.region.col..self.region.col + self.region.cols)
                .map(|col| Position::new(self.line, col))
                .collect(),
            Orientation::Vertical => (self.region.row..self.region.row + self.region.rows)
                .map(|row| Position::new(row, self.line))
                .collect(),
        }
    }
}

/// Unit of work performed by [`MazeGeneration::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationStep {
    /// The grid was wiped, barriers and endpoints included.
    Cleared,
    /// Loose barriers were scattered over the interior; carries how many.
    Scattered(usize),
    /// A region was divided. `placed` tells whether the wall was actually drawn.
    Partitioned {
        /// The wall chosen for the region.
        wall: Wall,
        /// Whether the density roll let the wall through.
        placed: bool,
    },
    /// Corner patches were opened up; carries how many barriers were removed.
    CornersCleared(usize),
    /// The connectivity repair ran. This is always the last step.
    Repaired(RepairReport),
}

/// Where a generation currently stands.
#[derive(Debug)]
enum Phase {
    /// Wipe the grid.
    Clear,
    /// Scatter loose barriers.
    Scatter,
    /// Divide the regions left on the stack, last one first.
    Partition(Vec<Region>),
    /// Open up the corner patches.
    Corners,
    /// Run the connectivity repair.
    Repair,
    /// Nothing left to do.
    Done,
}

/// A stepwise maze generation.
///
/// Each call to [`MazeGeneration::step`] performs one unit of work, one wall per call during the
/// division phase, so a renderer can redraw between walls. Dropping the value at a step boundary
/// cancels the generation and leaves the grid as it stands.
#[derive(Debug)]
pub struct MazeGeneration<R> {
    /// Probability of drawing each wall, in `(0, 1)`.
    density: f64,
    /// Source of every random decision.
    rng: R,
    /// Next unit of work.
    phase: Phase,
}

impl<R: Rng> MazeGeneration<R> {
    /// Prepares a generation with the given density.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDensity`] unless `0 < density < 1`.
    pub fn new(density: f64, rng: R) -> Result<Self> {
        if !(density > 0.0 && density < 1.0) {
            return Err(Error::InvalidDensity(density));
        }

        Ok(Self {
            density,
            rng,
            phase: Phase::Clear,
        })
    }

    /// Wall probability of this generation.
    pub const fn density(&self) -> f64 {
        self.density
    }

    /// Returns whether every step has been performed.
    pub const fn is_done(&self) -> bool {
        matches!(self.phase, Phase::Done)
    }

    /// Performs the next unit of work, or returns `None` once the generation is over.
    pub fn step(&mut self, grid: &mut Grid) -> Option<GenerationStep> {
        match mem::replace(&mut self.phase, Phase::Done) {
            Phase::Clear => {
                grid.reset(false);
                self.phase = Phase::Scatter;
                Some(GenerationStep::Cleared)
            }
            Phase::Scatter => {
                let scattered = self.scatter(grid);
                let inner = grid.size().saturating_sub(2);
                self.phase = Phase::Partition(vec![Region {
                    row: 1,
                    col: 1,
                    rows: inner,
                    cols: inner,
                }]);
                Some(GenerationStep::Scattered(scattered))
            }
            Phase::Partition(mut regions) => {
                while let Some(region) = regions.pop() {
                    if region.rows < MIN_REGION_SIDE || region.cols < MIN_REGION_SIDE {
                        continue;
                    }

                    let (wall, placed, halves) = self.divide(grid, region);
                    // Second half first so the first half is divided next.
                    regions.extend(halves.into_iter().rev().flatten());
                    self.phase = Phase::Partition(regions);
                    return Some(GenerationStep::Partitioned { wall, placed });
                }

                self.phase = Phase::Corners;
                self.step(grid)
            }
            Phase::Corners => {
                let cleared = self.clear_corners(grid);
                self.phase = Phase::Repair;
                Some(GenerationStep::CornersCleared(cleared))
            }
            Phase::Repair => {
                let report = ensure_navigable(grid, &mut self.rng);
                log::info!(
                    "generated a {0}x{0} maze at density {1:.2} with {2} barriers",
                    grid.size(),
                    self.density,
                    grid.barrier_indices().len()
                );
                Some(GenerationStep::Repaired(report))
            }
            Phase::Done => None,
        }
    }

    /// Turns interior cells into barriers at random. Returns how many were placed.
    fn scatter(&mut self, grid: &mut Grid) -> usize {
        let size = grid.size();
        let probability = self.density * SCATTER_FACTOR;
        let mut scattered = 0;

        for row in 1..size.saturating_sub(1) {
            for col in 1..size.saturating_sub(1) {
                if self.rng.random_bool(probability) {
                    if let Some(index) = grid.index_of(Position::new(row, col)) {
                        grid.make_barrier(index);
                        scattered += 1;
                    }
                }
            }
        }

        scattered
    }

    /// Picks and possibly draws a wall across `region`, returning the sub-regions to divide next.
    ///
    /// Wider regions get a vertical wall, the others a horizontal one. The wall line is picked away
    /// from the region's edges and the gap anywhere along the wall.
    fn divide(&mut self, grid: &mut Grid, region: Region) -> (Wall, bool, [Option<Region>; 2]) {
        let (wall, halves) = if region.cols > region.rows {
            let line = region.col + self.rng.random_range(1..=region.cols - 2);
            let gap = Position::new(region.row + self.rng.random_range(0..region.rows), line);
            let halves = if region.cols > SPLIT_THRESHOLD {
                [
                    Some(Region {
                        cols: line - region.col,
                        ..region
                    }),
                    Some(Region {
                        col: line + 1,
                        cols: region.col + region.cols - line - 1,
                        ..region
                    }),
                ]
            } else {
                [None, None]
            };
            let wall = Wall {
                region,
                orientation: Orientation::Vertical,
                line,
                gap,
            };
            (wall, halves)
        } else {
            let line = region.row + self.rng.random_range(1..=region.rows - 2);
            let gap = Position::new(line, region.col + self.rng.random_range(0..region.cols));
            let halves = if region.rows > SPLIT_THRESHOLD {
                [
                    Some(Region {
                        rows: line - region.row,
                        ..region
                    }),
                    Some(Region {
                        row: line + 1,
                        rows: region.row + region.rows - line - 1,
                        ..region
                    }),
                ]
            } else {
                [None, None]
            };
            let wall = Wall {
                region,
                orientation: Orientation::Horizontal,
                line,
                gap,
            };
            (wall, halves)
        };

        let placed = self.rng.random_bool(self.density);
        if placed {
            for position in wall.cells() {
                if position == wall.gap {
                    continue;
                }
                if let Some(index) = grid.index_of(position) {
                    grid.make_barrier(index);
                }
            }
        }

        (wall, placed, halves)
    }

    /// Clears barriers in the four 3×3 corner patches at random. Returns how many were removed.
    fn clear_corners(&mut self, grid: &mut Grid) -> usize {
        let far = grid.size().saturating_sub(CORNER_SIZE + 1);
        let anchors = [(1, 1), (1, far), (far, 1), (far, far)];
        let mut cleared = 0;

        for (top, left) in anchors {
            for row in top..top + CORNER_SIZE {
                for col in left..left + CORNER_SIZE {
                    if !self.rng.random_bool(CORNER_CLEAR_PROBABILITY) {
                        continue;
                    }
                    let Some(index) = grid.index_of(Position::new(row, col)) else {
                        continue;
                    };
                    if grid.state_of(index) == Some(CellState::Barrier) {
                        grid.clear_index(index);
                        cleared += 1;
                    }
                }
            }
        }

        cleared
    }
}

/// Generates a maze on `grid` in one go.
///
/// # Errors
///
/// Returns [`Error::InvalidDensity`] unless `0 < density < 1`.
pub fn generate<R: Rng>(grid: &mut Grid, density: f64, rng: R) -> Result<RepairReport> {
    let mut generation = MazeGeneration::new(density, rng)?;
    let mut report = RepairReport::default();

    while let Some(step) = generation.step(grid) {
        if let GenerationStep::Repaired(repair) = step {
            report = repair;
        }
    }

    Ok(report)
}
