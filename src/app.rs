//! Core application state and logic for the pathfinding visualizer.

use color_eyre::eyre::Result;
use ratatui::DefaultTerminal;

use crate::{animation::AnimationManager, events, grid::Position, session::Session, ui, Config};

/// Application state container for the visualizer.
///
/// This structure holds the state of the application, which is to say the structure from which
/// Ratatui will render the grid and Crossterm events will help writing to.
#[derive(Debug)]
pub struct App {
    /// Application exit flag.
    ///
    /// This field indicates whether the application should exit. It is set to `true` when the user
    /// wants to quit but it starts off `false`.
    pub(crate) exit: bool,
    /// Grid, run in progress and run settings.
    pub(crate) session: Session,
    /// Cell the user is pointing at.
    ///
    /// Placement commands apply to this cell. It always lies within the grid.
    pub(crate) cursor: Position,
    /// Animation manager pacing the session's runs.
    pub(crate) animation_manager: AnimationManager,
}

impl App {
    /// Creates the application described by `config`.
    ///
    /// A [`Default`] trait implementation is not provided because building the session is fallible.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::InvalidSize`]
    /// - [`crate::Error::InvalidDensity`]
    pub fn new(config: &Config) -> Result<Self> {
        let session = config.session()?;
        let center = session.grid().size() / 2;

        Ok(Self {
            exit: false,
            session,
            cursor: Position::new(center, center),
            animation_manager: AnimationManager::new(config.step_delay()),
        })
    }

    /// Runs the main loop of the application.
    ///
    /// This function handles user input and updates the application state. The loop continues until
    /// the exit condition is `true`, after which the function returns to the call site.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        log::info!(
            "{0}x{0} grid ready, press s and e to place the endpoints",
            self.session.grid().size()
        );

        while !self.exit {
            let _ = terminal.try_draw(|frame| {
                ui::draw(self, frame)
                    .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))
            })?;
            events::handle_events(self)?;
        }

        Ok(())
    }

    /// Moves the cursor by the given offsets, stopping at the grid's edges.
    pub(crate) fn move_cursor(&mut self, rows: isize, cols: isize) {
        let last = self.session.grid().size().saturating_sub(1);
        self.cursor = Position::new(
            self.cursor.row.saturating_add_signed(rows).min(last),
            self.cursor.col.saturating_add_signed(cols).min(last),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Creates a small seeded application.
    fn create_test_app() -> App {
        let config = Config {
            size: 6,
            seed: Some(0),
            ..Config::default()
        };
        App::new(&config).expect("failed to create app")
    }

    #[test]
    fn test_new_app_centers_cursor() {
        let app = create_test_app();

        assert!(!app.exit);
        assert_eq!(app.cursor, Position::new(3, 3));
        assert!(!app.session.is_busy());
    }

    #[test]
    fn test_cursor_stays_inside_grid() {
        let mut app = create_test_app();

        app.move_cursor(-10, -10);
        assert_eq!(app.cursor, Position::new(0, 0));

        app.move_cursor(10, 10);
        assert_eq!(app.cursor, Position::new(5, 5));

        app.move_cursor(-1, 0);
        assert_eq!(app.cursor, Position::new(4, 5));
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let config = Config {
            size: 0,
            ..Config::default()
        };

        assert!(App::new(&config).is_err());
    }
}
