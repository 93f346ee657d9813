//! Reachability probing and best-effort maze repair.
//!
//! The repair loop only mitigates disconnected mazes. After its attempt budget runs out it strips a
//! share of the barriers and stops, so callers must not assume any two cells are connected.

use std::collections::{HashSet, VecDeque};

use rand::{seq::IndexedRandom as _, Rng};

use crate::grid::{CellState, Grid, Position, ORTHOGONAL};

/// Number of random endpoint pairs tried before falling back.
pub const MAX_ATTEMPTS: usize = 10;

/// Failed attempts after which every further failure also strips barriers.
const ESCALATE_AFTER: usize = 5;

/// Each escalated failure strips one barrier in this many (5%).
const ESCALATION_DIVISOR: usize = 20;

/// The fallback strips one barrier in this many (20%).
const FALLBACK_DIVISOR: usize = 5;

/// Summary of an [`ensure_navigable`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Endpoint pairs tried.
    pub attempts: usize,
    /// Whether the last tried pair was connected.
    pub connected: bool,
    /// Barriers removed by escalation and fallback.
    pub stripped: usize,
}

/// Returns whether `to` can be reached from `from` through orthogonal moves over non-barrier cells.
///
/// Start and end coloring is irrelevant here and cached neighbor lists are not consulted, so this
/// works on a grid whose adjacency is stale. Out-of-bounds or barrier endpoints are unreachable.
pub fn is_reachable(grid: &Grid, from: Position, to: Position) -> bool {
    let passable = |position: Position| {
        grid.cell(position)
            .is_some_and(|cell| cell.state() != CellState::Barrier)
    };

    if !passable(from) || !passable(to) {
        return false;
    }

    let mut queue = VecDeque::from([from]);
    let mut seen = HashSet::from([from]);

    while let Some(current) = queue.pop_front() {
        if current == to {
            return true;
        }

        for (rows, cols) in ORTHOGONAL {
            let Some(next) = current.offset(rows, cols) else {
                continue;
            };
            if passable(next) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }

    false
}

/// Tries to make a freshly generated maze navigable.
///
/// Up to [`MAX_ATTEMPTS`] times, two random interior cells at least a third of the grid apart are
/// picked, cleared if they are barriers and probed with [`is_reachable`]. The loop stops at the first
/// connected pair. From the sixth attempt on, each failure also strips 5% of the barriers. When every
/// attempt fails, 20% of the barriers are stripped as a last resort. Grids smaller than 4×4 have no
/// suitable interior pair and are left alone.
pub fn ensure_navigable<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> RepairReport {
    let size = grid.size();
    let mut report = RepairReport::default();

    if size < 4 {
        log::debug!("skipping maze repair on a {size}x{size} grid");
        return report;
    }

    for attempt in 1..=MAX_ATTEMPTS {
        report.attempts = attempt;

        let (from, to) = loop {
            let from = random_interior(size, rng);
            let to = random_interior(size, rng);
            if from.manhattan(to) >= size / 3 {
                break (from, to);
            }
        };

        let endpoints = [grid.index_of(from), grid.index_of(to)];
        for index in endpoints.into_iter().flatten() {
            if grid.state_of(index) == Some(CellState::Barrier) {
                grid.clear_index(index);
            }
        }

        if is_reachable(grid, from, to) {
            report.connected = true;
            log::debug!("maze connected {from} to {to} on attempt {attempt}");
            return report;
        }

        if attempt > ESCALATE_AFTER {
            report.stripped += strip_barriers(grid, rng, ESCALATION_DIVISOR);
        }
    }

    report.stripped += strip_barriers(grid, rng, FALLBACK_DIVISOR);
    log::warn!(
        "maze repair exhausted {MAX_ATTEMPTS} attempts, stripped {} barriers",
        report.stripped
    );

    report
}

/// Picks a uniformly random cell off the border.
fn random_interior<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Position {
    Position::new(rng.random_range(1..size - 1), rng.random_range(1..size - 1))
}

/// Clears a random `1 / divisor` share of the barriers, rounded up. Returns how many were cleared.
fn strip_barriers<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R, divisor: usize) -> usize {
    let barriers = grid.barrier_indices();
    let count = barriers.len().div_ceil(divisor);

    let chosen: Vec<usize> = barriers.choose_multiple(rng, count).copied().collect();
    for index in &chosen {
        grid.clear_index(*index);
    }

    chosen.len()
}
