//! Error taxonomy for the grid, search and maze generation core.

use thiserror::Error;

use crate::grid::Position;

/// Result alias used throughout the core modules.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Reason a placement command was rejected.
///
/// This enumeration details why [`Error::InvalidPlacement`] was raised.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementConflict {
    /// The position lies outside the grid.
    OutOfBounds,
    /// A barrier was requested on the cell holding the start role.
    BarrierOnStart,
    /// A barrier was requested on the cell holding the end role.
    BarrierOnEnd,
    /// The start role was requested on the cell holding the end role.
    StartOnEnd,
    /// The end role was requested on the cell holding the start role.
    EndOnStart,
}

impl PlacementConflict {
    /// Returns a short human readable description of the conflict.
    pub const fn repr(self) -> &'static str {
        match self {
            Self::OutOfBounds => "position is outside the grid",
            Self::BarrierOnStart => "cannot place a barrier on the start cell",
            Self::BarrierOnEnd => "cannot place a barrier on the end cell",
            Self::StartOnEnd => "cannot place the start on the end cell",
            Self::EndOnStart => "cannot place the end on the start cell",
        }
    }
}

/// Errors reported by the core.
///
/// Every variant is local and recoverable. A run that exhausts its frontier is not an error; it is
/// reported as [`Outcome::NotFound`](crate::search::Outcome::NotFound).
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// A start, end or barrier placement violated a grid invariant. The grid was not modified.
    #[error("invalid placement at {position}: {}", .reason.repr())]
    InvalidPlacement {
        /// Position the placement targeted.
        position: Position,
        /// Invariant the placement would have broken.
        reason: PlacementConflict,
    },
    /// A search was requested without both endpoints assigned.
    #[error("both a start and an end cell must be placed before searching")]
    MissingEndpoints,
    /// Maze density must lie strictly between zero and one.
    #[error("maze density {0} is outside the open interval (0, 1)")]
    InvalidDensity(f64),
    /// Grids must have at least one cell.
    #[error("grid size {0} is invalid")]
    InvalidSize(usize),
    /// An algorithm tag could not be parsed.
    #[error("unknown algorithm `{0}`, expected one of astar, dijkstra, bfs, dfs")]
    UnknownAlgorithm(String),
}
