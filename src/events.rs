//! Event handling functions for user input and application state updates.

use std::time::Duration;

use color_eyre::eyre::Result;
use ratatui::crossterm::event::{self, Event, KeyEventKind};

use crate::{session::Session, types::Command, App};

/// Longest time the loop waits for input before redrawing.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Density change per key press.
const DENSITY_STEP: f64 = 0.05;

/// Handles input events and updates the application state accordingly.
///
/// This function polls for keyboard events and dispatches them to [`apply`]. While a run is in
/// progress the poll only waits until the next animation step is due, so the UI keeps moving.
pub(crate) fn handle_events(app: &mut App) -> Result<()> {
    let timeout = if app.session.is_busy() {
        app.animation_manager.time_until_next().min(POLL_TIMEOUT)
    } else {
        POLL_TIMEOUT
    };

    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                if let Some(command) = Command::from_key(key.code) {
                    apply(app, command);
                }
            }
        }
    }

    let _ = app.animation_manager.update(&mut app.session);

    Ok(())
}

/// Applies a command to the application.
///
/// Rejected commands, such as running without endpoints or placing a barrier on the start cell, are
/// reported through the log and otherwise ignored.
pub(crate) fn apply(app: &mut App, command: Command) {
    if command.mutates_grid() {
        app.animation_manager.restart();
    }

    let result = match command {
        Command::Quit => {
            app.exit = true;
            Ok(())
        }
        Command::Move(rows, cols) => {
            app.move_cursor(rows, cols);
            Ok(())
        }
        Command::Place(role) => app.session.place(app.cursor, role),
        Command::Clear => app.session.clear(app.cursor),
        Command::Run => app.session.run_selected(),
        Command::CycleAlgorithm => {
            let algorithm = app.session.cycle_algorithm();
            log::info!("algorithm set to {algorithm}");
            Ok(())
        }
        Command::ToggleDiagonal => {
            let diagonal = app.session.toggle_diagonal();
            log::info!(
                "diagonal moves {}",
                if diagonal { "enabled" } else { "disabled" }
            );
            Ok(())
        }
        Command::GenerateMaze => app.session.generate_selected(),
        Command::DensityUp => {
            let density = app.session.adjust_density(DENSITY_STEP);
            log::info!("maze density {density:.2}");
            Ok(())
        }
        Command::DensityDown => {
            let density = app.session.adjust_density(-DENSITY_STEP);
            log::info!("maze density {density:.2}");
            Ok(())
        }
        Command::Faster => {
            app.animation_manager.faster();
            Ok(())
        }
        Command::Slower => {
            app.animation_manager.slower();
            Ok(())
        }
        Command::Reset => {
            app.session.reset(true);
            Ok(())
        }
        Command::ResetAll => {
            app.session.reset(false);
            Ok(())
        }
        Command::Cancel => {
            cancel(&mut app.session);
            Ok(())
        }
    };

    if let Err(err) = result {
        log::warn!("{err}");
    }
}

/// Cancels the run in progress, if any.
fn cancel(session: &mut Session) {
    if session.is_busy() {
        session.cancel();
        log::info!("run cancelled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        grid::{CellState, Position, Role},
        search::Algorithm,
        Config,
    };

    /// Creates a small seeded application with a zero animation delay.
    fn create_test_app() -> App {
        let config = Config {
            size: 8,
            speed: 0,
            seed: Some(5),
            ..Config::default()
        };
        App::new(&config).expect("failed to create app")
    }

    /// Steps the session until it goes idle.
    fn finish(app: &mut App) {
        while app.session.is_busy() {
            let _ = app.session.step();
        }
    }

    #[test]
    fn test_quit() {
        let mut app = create_test_app();

        apply(&mut app, Command::Quit);

        assert!(app.exit);
    }

    #[test]
    fn test_place_under_cursor() {
        let mut app = create_test_app();

        apply(&mut app, Command::Move(-4, -4));
        apply(&mut app, Command::Place(Role::Start));
        apply(&mut app, Command::Move(0, 2));
        apply(&mut app, Command::Place(Role::Barrier));

        assert_eq!(app.session.cell_at(0, 0), Some(CellState::Start));
        assert_eq!(app.session.cell_at(0, 2), Some(CellState::Barrier));

        apply(&mut app, Command::Clear);
        assert_eq!(app.session.cell_at(0, 2), Some(CellState::Empty));
    }

    #[test]
    fn test_rejected_placement_keeps_grid() {
        let mut app = create_test_app();
        apply(&mut app, Command::Place(Role::Start));
        let before = app.session.grid().clone();

        apply(&mut app, Command::Place(Role::Barrier));

        assert_eq!(app.session.grid(), &before);
        assert!(!app.exit);
    }

    #[test]
    fn test_run_without_endpoints_does_nothing() {
        let mut app = create_test_app();

        apply(&mut app, Command::Run);

        assert!(!app.session.is_busy());
    }

    #[test]
    fn test_run_and_cancel() {
        let mut app = create_test_app();
        apply(&mut app, Command::Move(-4, -4));
        apply(&mut app, Command::Place(Role::Start));
        apply(&mut app, Command::Move(7, 7));
        apply(&mut app, Command::Place(Role::End));

        apply(&mut app, Command::Run);
        assert!(app.session.is_searching());

        apply(&mut app, Command::Cancel);
        assert!(!app.session.is_busy());

        apply(&mut app, Command::Run);
        finish(&mut app);
        assert_eq!(
            app.session.metrics().map(|metrics| metrics.path_length),
            Some(14)
        );
    }

    #[test]
    fn test_settings_commands() {
        let mut app = create_test_app();

        apply(&mut app, Command::CycleAlgorithm);
        apply(&mut app, Command::ToggleDiagonal);
        apply(&mut app, Command::DensityDown);
        apply(&mut app, Command::Slower);

        assert_eq!(app.session.algorithm(), Algorithm::Dijkstra);
        assert!(app.session.diagonal());
        assert!((app.session.density() - 0.6).abs() < 1e-9);
        assert_eq!(app.animation_manager.delay(), Duration::from_millis(5));
    }

    #[test]
    fn test_maze_then_reset_all() {
        let mut app = create_test_app();

        apply(&mut app, Command::GenerateMaze);
        assert!(app.session.is_generating());
        finish(&mut app);

        apply(&mut app, Command::ResetAll);
        assert!(app
            .session
            .grid()
            .cells()
            .iter()
            .all(|cell| cell.state() == CellState::Empty));
    }

    #[test]
    fn test_reset_keeps_barriers() {
        let mut app = create_test_app();
        app.cursor = Position::new(1, 1);
        apply(&mut app, Command::Place(Role::Barrier));
        app.cursor = Position::new(2, 2);
        apply(&mut app, Command::Place(Role::Start));

        apply(&mut app, Command::Reset);

        assert_eq!(app.session.cell_at(1, 1), Some(CellState::Barrier));
        assert_eq!(app.session.cell_at(2, 2), Some(CellState::Empty));
    }
}
