//! Grid pathfinding engine and terminal visualizer.
//!
//! The core is a square [`grid::Grid`] of cells on which four search strategies (A*, Dijkstra,
//! breadth-first and depth-first) run step by step, plus a recursive-division
//! [`maze::MazeGeneration`] with a best-effort reachability repair. Both run one unit of work per
//! call so a renderer can redraw in between; [`session::Session`] ties them together behind a small
//! command and query surface.
//!
//! The [`App`] type drives a session from a ratatui terminal interface.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

mod animation;
mod app;
pub mod config;
pub mod error;
mod events;
pub mod grid;
pub mod logging;
pub mod maze;
pub mod navigability;
pub mod path;
pub mod search;
pub mod session;
mod types;
mod ui;

pub use app::App;
pub use config::Config;
pub use error::{Error, Result};
