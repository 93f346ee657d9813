//! Path reconstruction from the parent links left behind by a search run.

use crate::grid::{CellState, Grid, Position};

/// The winning path of a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reconstruction {
    /// Positions from the start cell to the end cell, both included. Empty when the end was never
    /// reached.
    pub path: Vec<Position>,
    /// Number of edges traversed along the path.
    pub length: usize,
}

/// Walks the parent chain from `end` back to the start and marks the path.
///
/// Every strictly intermediate cell of the chain is marked [`CellState::Path`]; the endpoints keep
/// their roles. When `end` has no parent the search never reached it, so nothing is marked and the
/// returned length is zero.
pub fn reconstruct(grid: &mut Grid, end: Position) -> Reconstruction {
    let Some(end_index) = grid.index_of(end) else {
        return Reconstruction::default();
    };

    let start_index = grid.start_index();
    let mut chain = vec![end_index];
    let mut current = end_index;

    // Parents always point at cells expanded earlier, so the chain is bounded by the cell count.
    while Some(current) != start_index && chain.len() <= grid.cells().len() {
        let Some(parent) = grid.cell_by_index(current).and_then(|cell| cell.parent()) else {
            break;
        };
        chain.push(parent);
        current = parent;
    }

    if chain.len() < 2 {
        return Reconstruction::default();
    }

    let last = chain.len() - 1;
    for index in chain.iter().take(last).skip(1) {
        if !matches!(
            grid.state_of(*index),
            Some(CellState::Start | CellState::End | CellState::Barrier)
        ) {
            grid.set_state(*index, CellState::Path);
        }
    }

    let path = chain
        .iter()
        .rev()
        .filter_map(|index| grid.position_of(*index))
        .collect();

    Reconstruction { path, length: last }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Role;

    /// Builds a 1×5 corridor, links it right to left and closes the intermediate cells.
    fn linked_corridor() -> Grid {
        let mut grid = Grid::new(5).expect("failed to create grid");
        grid.place(Position::new(0, 0), Role::Start)
            .expect("start placement should succeed");
        grid.place(Position::new(0, 4), Role::End)
            .expect("end placement should succeed");
        for index in 1..5 {
            grid.set_costs(index, Some(index - 1), None, None);
        }
        for index in 1..4 {
            grid.set_state(index, CellState::Closed);
        }
        grid
    }

    #[test]
    fn test_reconstruct_marks_intermediate_cells() {
        let mut grid = linked_corridor();

        let result = reconstruct(&mut grid, Position::new(0, 4));

        assert_eq!(result.length, 4);
        assert_eq!(
            result.path,
            (0..5).map(|col| Position::new(0, col)).collect::<Vec<_>>()
        );
        assert_eq!(grid.cell_at(0, 0), Some(CellState::Start));
        assert_eq!(grid.cell_at(0, 4), Some(CellState::End));
        for col in 1..4 {
            assert_eq!(grid.cell_at(0, col), Some(CellState::Path));
        }
    }

    #[test]
    fn test_reconstruct_without_parent_marks_nothing() {
        let mut grid = Grid::new(3).expect("failed to create grid");
        grid.place(Position::new(0, 0), Role::Start)
            .expect("start placement should succeed");
        grid.place(Position::new(2, 2), Role::End)
            .expect("end placement should succeed");
        let before = grid.clone();

        let result = reconstruct(&mut grid, Position::new(2, 2));

        assert_eq!(result, Reconstruction::default());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_reconstruct_adjacent_endpoints() {
        let mut grid = Grid::new(2).expect("failed to create grid");
        grid.place(Position::new(0, 0), Role::Start)
            .expect("start placement should succeed");
        grid.place(Position::new(0, 1), Role::End)
            .expect("end placement should succeed");
        grid.set_costs(1, Some(0), Some(1), Some(1));

        let result = reconstruct(&mut grid, Position::new(0, 1));

        assert_eq!(result.length, 1);
        assert_eq!(result.path.len(), 2);
        assert!(grid
            .cells()
            .iter()
            .all(|cell| cell.state() != CellState::Path));
    }
}
