//! Grid model module.
//!
//! This module contains the [`Grid`] type and its cells. The grid exclusively owns every cell,
//! enforces the start/end/barrier placement invariants and computes the adjacency lists consumed by
//! the search algorithms.

use std::fmt;

use crate::error::{Error, PlacementConflict, Result};

/// Orthogonal moves in the order they are listed as neighbors: down, up, right, left.
pub(crate) const ORTHOGONAL: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Diagonal moves in the order they are listed as neighbors: down-right, down-left, up-right,
/// up-left.
const DIAGONAL: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Grid coordinate.
///
/// Rows grow downwards and columns grow to the right, both starting at zero in the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Zero-based row index.
    pub row: usize,
    /// Zero-based column index.
    pub col: usize,
}

impl Position {
    /// Builds a position from a row and a column.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance `|dr| + |dc|` to another position.
    pub const fn manhattan(self, other: Self) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Chebyshev distance `max(|dr|, |dc|)` to another position.
    pub const fn chebyshev(self, other: Self) -> usize {
        let rows = self.row.abs_diff(other.row);
        let cols = self.col.abs_diff(other.col);
        if rows > cols {
            rows
        } else {
            cols
        }
    }

    /// Offsets the position by a signed delta, returning `None` on underflow.
    pub(crate) const fn offset(self, rows: isize, cols: isize) -> Option<Self> {
        let Some(row) = self.row.checked_add_signed(rows) else {
            return None;
        };
        let Some(col) = self.col.checked_add_signed(cols) else {
            return None;
        };
        Some(Self { row, col })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "({}, {})", self.row, self.col)
    }
}

/// State of a single cell.
///
/// This enumeration replaces any notion of display color. The front end projects each state onto a
/// color when drawing; nothing in the core looks at colors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    /// Free, untouched cell.
    #[default]
    Empty,
    /// Cell that blocks traversal.
    Barrier,
    /// Cell holding the start role.
    Start,
    /// Cell holding the end role.
    End,
    /// Discovered by a run but not yet expanded.
    Open,
    /// Expanded by a run.
    Closed,
    /// Part of the reconstructed winning path.
    Path,
    /// Marked visited by a traversal.
    Visited,
}

impl CellState {
    /// Returns whether the state blocks traversal.
    pub const fn is_barrier(self) -> bool {
        matches!(self, Self::Barrier)
    }

    /// Returns whether the state is coloring left behind by a run.
    pub const fn is_run_mark(self) -> bool {
        matches!(self, Self::Open | Self::Closed | Self::Path | Self::Visited)
    }
}

/// Role a placement command assigns to a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// The unique start cell.
    Start,
    /// The unique end cell.
    End,
    /// A traversal-blocking barrier.
    Barrier,
}

/// A single addressable grid position.
///
/// Besides its state, a cell caches its neighbor list and carries the per-run bookkeeping used by
/// the search algorithms: a parent link and the tentative `g`/`f` costs. The parent link is an index
/// into the owning grid's cell array, never an owning reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Where the cell sits in the grid.
    position: Position,
    /// Current state of the cell.
    state: CellState,
    /// Indices of traversable neighbors as of the last recompute.
    neighbors: Vec<usize>,
    /// Index of the cell this one was reached from in the current run.
    parent: Option<usize>,
    /// Cost from the start cell, `None` meaning not reached yet.
    g: Option<u32>,
    /// Estimated total cost through this cell, `None` meaning not reached yet.
    f: Option<u32>,
}

impl Cell {
    /// Builds an empty cell at the given position.
    const fn new(position: Position) -> Self {
        Self {
            position,
            state: CellState::Empty,
            neighbors: Vec::new(),
            parent: None,
            g: None,
            f: None,
        }
    }

    /// Position of the cell.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Current state of the cell.
    pub const fn state(&self) -> CellState {
        self.state
    }

    /// Cached neighbor indices. Only meaningful after [`Grid::compute_neighbors`].
    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    /// Parent index recorded by the last run, if any.
    pub const fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Tentative cost from the start recorded by the last run.
    pub const fn g(&self) -> Option<u32> {
        self.g
    }

    /// Tentative total cost recorded by the last run.
    pub const fn f(&self) -> Option<u32> {
        self.f
    }

    /// Drops all per-run bookkeeping.
    fn clear_costs(&mut self) {
        self.parent = None;
        self.g = None;
        self.f = None;
    }
}

/// Fixed-size square grid.
///
/// The grid owns every cell in a single row-major array and remembers which cells hold the start
/// and end roles. Its side length is fixed at creation; resizing means building a new grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Side length of the grid.
    size: usize,
    /// Row-major cell storage.
    cells: Vec<Cell>,
    /// Index of the cell holding the start role.
    start: Option<usize>,
    /// Index of the cell holding the end role.
    end: Option<usize>,
}

impl Grid {
    /// Creates a `size`×`size` grid with every cell empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSize`] when `size` is zero or its square overflows.
    pub fn new(size: usize) -> Result<Self> {
        let total = size
            .checked_mul(size)
            .filter(|total| *total > 0)
            .ok_or(Error::InvalidSize(size))?;

        let cells = (0..total)
            .map(|index| Cell::new(Position::new(index / size, index % size)))
            .collect();

        Ok(Self {
            size,
            cells,
            start: None,
            end: None,
        })
    }

    /// Side length of the grid.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Position of the start cell, if one is placed.
    pub fn start(&self) -> Option<Position> {
        self.start.and_then(|index| self.position_of(index))
    }

    /// Position of the end cell, if one is placed.
    pub fn end(&self) -> Option<Position> {
        self.end.and_then(|index| self.position_of(index))
    }

    /// Index of the start cell.
    pub(crate) const fn start_index(&self) -> Option<usize> {
        self.start
    }

    /// Index of the end cell.
    pub(crate) const fn end_index(&self) -> Option<usize> {
        self.end
    }

    /// Converts a position into a cell index, or `None` if it lies outside the grid.
    pub const fn index_of(&self, position: Position) -> Option<usize> {
        if position.row < self.size && position.col < self.size {
            Some(position.row * self.size + position.col)
        } else {
            None
        }
    }

    /// Converts a cell index back into a position.
    pub fn position_of(&self, index: usize) -> Option<Position> {
        if index < self.cells.len() {
            Some(Position::new(index / self.size, index % self.size))
        } else {
            None
        }
    }

    /// Returns the cell at `position`.
    pub fn cell(&self, position: Position) -> Option<&Cell> {
        self.index_of(position)
            .and_then(|index| self.cells.get(index))
    }

    /// Returns the state of the cell at `(row, col)`, or `None` outside the grid.
    pub fn cell_at(&self, row: usize, col: usize) -> Option<CellState> {
        self.cell(Position::new(row, col)).map(Cell::state)
    }

    /// Returns the cell stored at `index`.
    pub(crate) fn cell_by_index(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// Returns the state of the cell stored at `index`.
    pub(crate) fn state_of(&self, index: usize) -> Option<CellState> {
        self.cells.get(index).map(Cell::state)
    }

    /// Overwrites the state of the cell stored at `index`.
    pub(crate) fn set_state(&mut self, index: usize, state: CellState) {
        if let Some(cell) = self.cells.get_mut(index) {
            cell.state = state;
        }
    }

    /// Records the search bookkeeping of the cell stored at `index`.
    pub(crate) fn set_costs(
        &mut self,
        index: usize,
        parent: Option<usize>,
        g: Option<u32>,
        f: Option<u32>,
    ) {
        if let Some(cell) = self.cells.get_mut(index) {
            cell.parent = parent;
            cell.g = g;
            cell.f = f;
        }
    }

    /// Assigns a role to the cell at `position`.
    ///
    /// Placing the start or end moves the role: the previous holder is cleared first. A start or end
    /// placed on a barrier replaces it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPlacement`] without touching the grid when the position is out of
    /// bounds, when a barrier targets the start or end cell, or when start and end would share a
    /// cell.
    pub fn place(&mut self, position: Position, role: Role) -> Result<()> {
        let reject = |reason| Error::InvalidPlacement { position, reason };

        let index = self
            .index_of(position)
            .ok_or_else(|| reject(PlacementConflict::OutOfBounds))?;

        match role {
            Role::Barrier => {
                if self.start == Some(index) {
                    return Err(reject(PlacementConflict::BarrierOnStart));
                }
                if self.end == Some(index) {
                    return Err(reject(PlacementConflict::BarrierOnEnd));
                }
                self.set_state(index, CellState::Barrier);
            }
            Role::Start => {
                if self.end == Some(index) {
                    return Err(reject(PlacementConflict::StartOnEnd));
                }
                if let Some(previous) = self.start.replace(index) {
                    self.set_state(previous, CellState::Empty);
                }
                self.set_state(index, CellState::Start);
            }
            Role::End => {
                if self.start == Some(index) {
                    return Err(reject(PlacementConflict::EndOnStart));
                }
                if let Some(previous) = self.end.replace(index) {
                    self.set_state(previous, CellState::Empty);
                }
                self.set_state(index, CellState::End);
            }
        }

        Ok(())
    }

    /// Returns the cell at `position` to [`CellState::Empty`], releasing any role it held.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPlacement`] when the position is out of bounds.
    pub fn clear(&mut self, position: Position) -> Result<()> {
        let index = self.index_of(position).ok_or(Error::InvalidPlacement {
            position,
            reason: PlacementConflict::OutOfBounds,
        })?;

        self.clear_index(index);

        Ok(())
    }

    /// Empties the cell stored at `index`, releasing any role it held.
    pub(crate) fn clear_index(&mut self, index: usize) {
        if self.start == Some(index) {
            self.start = None;
        }
        if self.end == Some(index) {
            self.end = None;
        }
        if let Some(cell) = self.cells.get_mut(index) {
            cell.state = CellState::Empty;
            cell.clear_costs();
        }
    }

    /// Turns the cell stored at `index` into a barrier unless it holds the start or end role.
    pub(crate) fn make_barrier(&mut self, index: usize) {
        if self.start != Some(index) && self.end != Some(index) {
            self.set_state(index, CellState::Barrier);
        }
    }

    /// Indices of every barrier cell, in row-major order.
    pub(crate) fn barrier_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.state.is_barrier())
            .map(|(index, _)| index)
            .collect()
    }

    /// Returns whether `position` is inside the grid and not a barrier.
    fn is_passable(&self, position: Position) -> bool {
        self.cell(position)
            .is_some_and(|cell| !cell.state.is_barrier())
    }

    /// Rebuilds every cell's neighbor list.
    ///
    /// Orthogonal neighbors are listed first (down, up, right, left), skipping barriers. With
    /// `diagonal_allowed`, diagonal neighbors follow (down-right, down-left, up-right, up-left); a
    /// diagonal is admitted only when its target and both orthogonal cells flanking the move are
    /// passable, so paths never cut across a barrier corner.
    pub fn compute_neighbors(&mut self, diagonal_allowed: bool) {
        let lists: Vec<Vec<usize>> = self
            .cells
            .iter()
            .map(|cell| self.neighbors_of(cell.position, diagonal_allowed))
            .collect();

        for (cell, neighbors) in self.cells.iter_mut().zip(lists) {
            cell.neighbors = neighbors;
        }
    }

    /// Computes the neighbor list of a single position.
    fn neighbors_of(&self, position: Position, diagonal_allowed: bool) -> Vec<usize> {
        let mut neighbors = Vec::with_capacity(8);

        for (rows, cols) in ORTHOGONAL {
            if let Some(target) = position.offset(rows, cols) {
                if self.is_passable(target) {
                    neighbors.extend(self.index_of(target));
                }
            }
        }

        if diagonal_allowed {
            for (rows, cols) in DIAGONAL {
                let (Some(target), Some(vertical), Some(horizontal)) = (
                    position.offset(rows, cols),
                    position.offset(rows, 0),
                    position.offset(0, cols),
                ) else {
                    continue;
                };

                if self.is_passable(target)
                    && self.is_passable(vertical)
                    && self.is_passable(horizontal)
                {
                    neighbors.extend(self.index_of(target));
                }
            }
        }

        neighbors
    }

    /// Clears run coloring and bookkeeping, and optionally barriers.
    ///
    /// Every open, closed, path and visited cell returns to empty, and all cost and parent fields are
    /// dropped. Barriers survive only when `keep_barriers` is set. The start and end roles are always
    /// released; use [`Grid::clear_search`] to keep them.
    pub fn reset(&mut self, keep_barriers: bool) {
        for cell in &mut self.cells {
            if !(keep_barriers && cell.state.is_barrier()) {
                cell.state = CellState::Empty;
            }
            cell.clear_costs();
        }

        self.start = None;
        self.end = None;
    }

    /// Clears run coloring and bookkeeping while keeping barriers and both endpoints.
    pub fn clear_search(&mut self) {
        for cell in &mut self.cells {
            if cell.state.is_run_mark() {
                cell.state = CellState::Empty;
            }
            cell.clear_costs();
        }
    }

    /// Drops all cost and parent fields without touching any state.
    pub(crate) fn clear_costs(&mut self) {
        for cell in &mut self.cells {
            cell.clear_costs();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Collects the neighbor positions of the cell at `position`.
    fn neighbor_positions(grid: &Grid, position: Position) -> Vec<Position> {
        grid.cell(position)
            .expect("position should be inside the grid")
            .neighbors()
            .iter()
            .filter_map(|index| grid.position_of(*index))
            .collect()
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(4).expect("failed to create grid");

        assert_eq!(grid.size(), 4);
        assert_eq!(grid.cells().len(), 16);
        assert!(grid
            .cells()
            .iter()
            .all(|cell| cell.state() == CellState::Empty));
        assert_eq!(grid.start(), None);
        assert_eq!(grid.end(), None);
    }

    #[test]
    fn test_new_grid_rejects_zero_size() {
        assert_eq!(Grid::new(0), Err(Error::InvalidSize(0)));
    }

    #[test]
    fn test_cell_positions_are_row_major() {
        let grid = Grid::new(3).expect("failed to create grid");

        assert_eq!(
            grid.cells().get(5).map(Cell::position),
            Some(Position::new(1, 2))
        );
        assert_eq!(grid.index_of(Position::new(2, 1)), Some(7));
        assert_eq!(grid.index_of(Position::new(3, 0)), None);
    }

    #[test]
    fn test_place_start_moves_previous_start() {
        let mut grid = Grid::new(5).expect("failed to create grid");

        grid.place(Position::new(0, 0), Role::Start)
            .expect("first start placement should succeed");
        grid.place(Position::new(2, 2), Role::Start)
            .expect("second start placement should succeed");

        assert_eq!(grid.cell_at(0, 0), Some(CellState::Empty));
        assert_eq!(grid.cell_at(2, 2), Some(CellState::Start));
        assert_eq!(grid.start(), Some(Position::new(2, 2)));
        assert_eq!(
            grid.cells()
                .iter()
                .filter(|cell| cell.state() == CellState::Start)
                .count(),
            1
        );
    }

    #[test]
    fn test_place_barrier_on_endpoint_is_rejected() {
        let mut grid = Grid::new(5).expect("failed to create grid");
        grid.place(Position::new(1, 1), Role::Start)
            .expect("start placement should succeed");
        grid.place(Position::new(3, 3), Role::End)
            .expect("end placement should succeed");
        let before = grid.clone();

        assert_eq!(
            grid.place(Position::new(1, 1), Role::Barrier),
            Err(Error::InvalidPlacement {
                position: Position::new(1, 1),
                reason: PlacementConflict::BarrierOnStart,
            })
        );
        assert_eq!(
            grid.place(Position::new(3, 3), Role::Barrier),
            Err(Error::InvalidPlacement {
                position: Position::new(3, 3),
                reason: PlacementConflict::BarrierOnEnd,
            })
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn test_place_start_on_end_is_rejected() {
        let mut grid = Grid::new(5).expect("failed to create grid");
        grid.place(Position::new(3, 3), Role::End)
            .expect("end placement should succeed");

        let result = grid.place(Position::new(3, 3), Role::Start);

        assert!(matches!(
            result,
            Err(Error::InvalidPlacement {
                reason: PlacementConflict::StartOnEnd,
                ..
            })
        ));
        assert_eq!(grid.cell_at(3, 3), Some(CellState::End));
        assert_eq!(grid.start(), None);
    }

    #[test]
    fn test_place_out_of_bounds_is_rejected() {
        let mut grid = Grid::new(3).expect("failed to create grid");

        assert!(matches!(
            grid.place(Position::new(3, 0), Role::Barrier),
            Err(Error::InvalidPlacement {
                reason: PlacementConflict::OutOfBounds,
                ..
            })
        ));
        assert!(grid.clear(Position::new(0, 7)).is_err());
    }

    #[test]
    fn test_start_replaces_barrier() {
        let mut grid = Grid::new(3).expect("failed to create grid");
        grid.place(Position::new(1, 1), Role::Barrier)
            .expect("barrier placement should succeed");
        grid.place(Position::new(1, 1), Role::Start)
            .expect("start placement should succeed");

        assert_eq!(grid.cell_at(1, 1), Some(CellState::Start));
    }

    #[test]
    fn test_barrier_then_clear_round_trips() {
        let mut grid = Grid::new(4).expect("failed to create grid");
        let pristine = grid.clone();

        grid.place(Position::new(2, 1), Role::Barrier)
            .expect("barrier placement should succeed");
        grid.clear(Position::new(2, 1))
            .expect("clearing should succeed");

        assert_eq!(grid, pristine);
    }

    #[test]
    fn test_clear_releases_role() {
        let mut grid = Grid::new(4).expect("failed to create grid");
        grid.place(Position::new(0, 3), Role::End)
            .expect("end placement should succeed");

        grid.clear(Position::new(0, 3))
            .expect("clearing should succeed");

        assert_eq!(grid.end(), None);
        assert_eq!(grid.cell_at(0, 3), Some(CellState::Empty));
    }

    #[test]
    fn test_orthogonal_neighbors_order_and_barriers() {
        let mut grid = Grid::new(3).expect("failed to create grid");
        grid.place(Position::new(1, 2), Role::Barrier)
            .expect("barrier placement should succeed");
        grid.compute_neighbors(false);

        assert_eq!(
            neighbor_positions(&grid, Position::new(1, 1)),
            vec![
                Position::new(2, 1),
                Position::new(0, 1),
                Position::new(1, 0)
            ]
        );
        assert_eq!(
            neighbor_positions(&grid, Position::new(0, 0)),
            vec![Position::new(1, 0), Position::new(0, 1)]
        );
    }

    #[test]
    fn test_diagonal_neighbors_open_grid() {
        let mut grid = Grid::new(3).expect("failed to create grid");
        grid.compute_neighbors(true);

        assert_eq!(neighbor_positions(&grid, Position::new(1, 1)).len(), 8);
        assert_eq!(
            neighbor_positions(&grid, Position::new(0, 0)),
            vec![
                Position::new(1, 0),
                Position::new(0, 1),
                Position::new(1, 1)
            ]
        );
    }

    #[test]
    fn test_diagonal_neighbors_do_not_cut_corners() {
        let mut grid = Grid::new(3).expect("failed to create grid");
        grid.place(Position::new(1, 0), Role::Barrier)
            .expect("barrier placement should succeed");
        grid.compute_neighbors(true);

        let neighbors = neighbor_positions(&grid, Position::new(0, 0));

        assert_eq!(neighbors, vec![Position::new(0, 1)]);
        assert!(!neighbors.contains(&Position::new(1, 1)));
    }

    #[test]
    fn test_reset_keeping_barriers_is_idempotent() {
        let mut grid = Grid::new(4).expect("failed to create grid");
        grid.place(Position::new(0, 0), Role::Start)
            .expect("start placement should succeed");
        grid.place(Position::new(3, 3), Role::End)
            .expect("end placement should succeed");
        grid.place(Position::new(1, 1), Role::Barrier)
            .expect("barrier placement should succeed");
        grid.set_state(6, CellState::Closed);
        grid.set_state(7, CellState::Path);
        grid.set_costs(7, Some(6), Some(2), Some(4));

        grid.reset(true);
        let once = grid.clone();
        grid.reset(true);

        assert_eq!(grid, once);
        assert_eq!(grid.cell_at(1, 1), Some(CellState::Barrier));
        assert_eq!(grid.cell_at(1, 2), Some(CellState::Empty));
        assert_eq!(grid.start(), None);
        assert_eq!(grid.end(), None);
        assert!(grid.cells().iter().all(|cell| cell.parent().is_none()));
    }

    #[test]
    fn test_reset_without_barriers_empties_everything() {
        let mut grid = Grid::new(4).expect("failed to create grid");
        grid.place(Position::new(1, 1), Role::Barrier)
            .expect("barrier placement should succeed");

        grid.reset(false);

        assert_eq!(grid, Grid::new(4).expect("failed to create grid"));
    }

    #[test]
    fn test_clear_search_keeps_layout() {
        let mut grid = Grid::new(4).expect("failed to create grid");
        grid.place(Position::new(0, 0), Role::Start)
            .expect("start placement should succeed");
        grid.place(Position::new(3, 3), Role::End)
            .expect("end placement should succeed");
        grid.place(Position::new(2, 2), Role::Barrier)
            .expect("barrier placement should succeed");
        grid.set_state(1, CellState::Open);
        grid.set_state(4, CellState::Visited);

        grid.clear_search();

        assert_eq!(grid.cell_at(0, 0), Some(CellState::Start));
        assert_eq!(grid.cell_at(3, 3), Some(CellState::End));
        assert_eq!(grid.cell_at(2, 2), Some(CellState::Barrier));
        assert_eq!(grid.cell_at(0, 1), Some(CellState::Empty));
        assert_eq!(grid.cell_at(1, 0), Some(CellState::Empty));
    }

    #[test]
    fn test_position_distances() {
        let origin = Position::new(1, 1);
        let target = Position::new(4, 3);

        assert_eq!(origin.manhattan(target), 5);
        assert_eq!(origin.chebyshev(target), 3);
        assert_eq!(target.to_string(), "(4, 3)");
    }
}
