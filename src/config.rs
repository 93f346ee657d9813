//! Command-line configuration.

use std::time::Duration;

use clap::Parser;

use crate::{
    animation::DEFAULT_DELAY_MS,
    error::Result,
    search::Algorithm,
    session::{Session, DEFAULT_DENSITY},
};

/// Smallest accepted grid side.
const MIN_SIZE: usize = 5;

/// Largest accepted grid side.
const MAX_SIZE: usize = 100;

/// Startup options of the visualizer.
#[derive(Clone, Debug, Parser)]
#[command(version, about)]
pub struct Config {
    /// Side length of the square grid.
    #[arg(long, short = 'n', default_value_t = 25, value_parser = parse_size)]
    pub size: usize,
    /// Initial maze density, strictly between 0 and 1.
    #[arg(long, short, default_value_t = DEFAULT_DENSITY, value_parser = parse_density)]
    pub density: f64,
    /// Initial search algorithm: astar, dijkstra, bfs or dfs.
    #[arg(long, short, default_value_t = Algorithm::AStar)]
    pub algorithm: Algorithm,
    /// Start with diagonal movement enabled.
    #[arg(long)]
    pub diagonal: bool,
    /// Milliseconds between two animation steps.
    #[arg(long, short, default_value_t = DEFAULT_DELAY_MS)]
    pub speed: u64,
    /// Seed for maze generation, for reproducible mazes.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: 25,
            density: DEFAULT_DENSITY,
            algorithm: Algorithm::AStar,
            diagonal: false,
            speed: DEFAULT_DELAY_MS,
            seed: None,
        }
    }
}

impl Config {
    /// Delay between two animation steps.
    pub const fn step_delay(&self) -> Duration {
        Duration::from_millis(self.speed)
    }

    /// Builds the session described by these options.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidSize`] or [`crate::Error::InvalidDensity`] for values that
    /// bypassed the argument parser.
    pub fn session(&self) -> Result<Session> {
        let mut session = Session::new(self.size, self.seed)?;
        session.set_density(self.density)?;
        session.set_algorithm(self.algorithm);
        session.set_diagonal(self.diagonal);
        Ok(session)
    }
}

/// Parses a grid side within the accepted range.
fn parse_size(value: &str) -> std::result::Result<usize, String> {
    let size: usize = value
        .parse()
        .map_err(|_err| format!("`{value}` is not a grid size"))?;
    if (MIN_SIZE..=MAX_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(format!("grid size must be between {MIN_SIZE} and {MAX_SIZE}"))
    }
}

/// Parses a density strictly between 0 and 1.
fn parse_density(value: &str) -> std::result::Result<f64, String> {
    let density: f64 = value
        .parse()
        .map_err(|_err| format!("`{value}` is not a number"))?;
    if density > 0.0 && density < 1.0 {
        Ok(density)
    } else {
        Err("density must be strictly between 0 and 1".to_owned())
    }
}
