//! Type definitions for user commands and their key bindings.

use ratatui::crossterm::event::KeyCode;

use crate::grid::Role;

/// Enumeration of the commands a key press can issue.
///
/// This enumeration decouples the key bindings from their effect on the application, so that the
/// bindings and the hint bar can be listed and tested without a terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    /// Leave the application.
    Quit,
    /// Move the cursor by the given number of rows and columns.
    Move(isize, isize),
    /// Place the given role under the cursor.
    Place(Role),
    /// Clear the cell under the cursor.
    Clear,
    /// Run the selected algorithm.
    Run,
    /// Select the next algorithm.
    CycleAlgorithm,
    /// Toggle diagonal movement.
    ToggleDiagonal,
    /// Generate a maze at the selected density.
    GenerateMaze,
    /// Raise the maze density one notch.
    DensityUp,
    /// Lower the maze density one notch.
    DensityDown,
    /// Shorten the delay between animation steps.
    Faster,
    /// Lengthen the delay between animation steps.
    Slower,
    /// Clear search coloring and endpoints, keeping the barriers.
    Reset,
    /// Clear the whole grid.
    ResetAll,
    /// Abandon the run in progress.
    Cancel,
}

impl Command {
    /// Key hints shown in the bottom bar, in display order.
    pub(crate) const HINTS: [(&'static str, &'static str); 12] = [
        ("hjkl", "move"),
        ("s/e/b", "start/end/wall"),
        ("x", "clear"),
        ("enter", "run"),
        ("a", "algorithm"),
        ("d", "diagonal"),
        ("m", "maze"),
        ("+/-", "density"),
        ("[/]", "speed"),
        ("r/c", "reset"),
        ("esc", "cancel"),
        ("q", "quit"),
    ];

    /// Maps a key to the command it is bound to, if any.
    pub(crate) const fn from_key(code: KeyCode) -> Option<Self> {
        let command = match code {
            KeyCode::Char('q') => Self::Quit,
            KeyCode::Char('k') | KeyCode::Up => Self::Move(-1, 0),
            KeyCode::Char('j') | KeyCode::Down => Self::Move(1, 0),
            KeyCode::Char('h') | KeyCode::Left => Self::Move(0, -1),
            KeyCode::Char('l') | KeyCode::Right => Self::Move(0, 1),
            KeyCode::Char('s') => Self::Place(Role::Start),
            KeyCode::Char('e') => Self::Place(Role::End),
            KeyCode::Char('b') => Self::Place(Role::Barrier),
            KeyCode::Char('x') | KeyCode::Delete | KeyCode::Backspace => Self::Clear,
            KeyCode::Enter | KeyCode::Char(' ') => Self::Run,
            KeyCode::Char('a') => Self::CycleAlgorithm,
            KeyCode::Char('d') => Self::ToggleDiagonal,
            KeyCode::Char('m') => Self::GenerateMaze,
            KeyCode::Char('+' | '=') => Self::DensityUp,
            KeyCode::Char('-') => Self::DensityDown,
            KeyCode::Char(']') => Self::Faster,
            KeyCode::Char('[') => Self::Slower,
            KeyCode::Char('r') => Self::Reset,
            KeyCode::Char('c') => Self::ResetAll,
            KeyCode::Esc => Self::Cancel,
            _ => return None,
        };

        Some(command)
    }

    /// Returns whether the command changes the grid, which cancels any run in progress.
    pub(crate) const fn mutates_grid(self) -> bool {
        matches!(
            self,
            Self::Place(_)
                | Self::Clear
                | Self::Run
                | Self::GenerateMaze
                | Self::Reset
                | Self::ResetAll
                | Self::Cancel
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vim_keys_and_arrows_agree() {
        for (vim, arrow) in [
            ('k', KeyCode::Up),
            ('j', KeyCode::Down),
            ('h', KeyCode::Left),
            ('l', KeyCode::Right),
        ] {
            assert_eq!(Command::from_key(KeyCode::Char(vim)), Command::from_key(arrow));
        }
    }

    #[test]
    fn test_placement_keys() {
        assert_eq!(
            Command::from_key(KeyCode::Char('s')),
            Some(Command::Place(Role::Start))
        );
        assert_eq!(
            Command::from_key(KeyCode::Char('e')),
            Some(Command::Place(Role::End))
        );
        assert_eq!(
            Command::from_key(KeyCode::Char('b')),
            Some(Command::Place(Role::Barrier))
        );
        assert_eq!(Command::from_key(KeyCode::Char('x')), Some(Command::Clear));
    }

    #[test]
    fn test_run_and_maze_keys() {
        assert_eq!(Command::from_key(KeyCode::Enter), Some(Command::Run));
        assert_eq!(Command::from_key(KeyCode::Char(' ')), Some(Command::Run));
        assert_eq!(
            Command::from_key(KeyCode::Char('m')),
            Some(Command::GenerateMaze)
        );
        assert_eq!(Command::from_key(KeyCode::Esc), Some(Command::Cancel));
        assert!(Command::HINTS.contains(&("esc", "cancel")));
    }

    #[test]
    fn test_unbound_keys() {
        for code in [KeyCode::Char('z'), KeyCode::Tab, KeyCode::F(1)] {
            assert_eq!(Command::from_key(code), None);
        }
    }

    #[test]
    fn test_settings_do_not_mutate_grid() {
        for command in [
            Command::Move(1, 0),
            Command::CycleAlgorithm,
            Command::ToggleDiagonal,
            Command::DensityUp,
            Command::Faster,
            Command::Quit,
        ] {
            assert!(!command.mutates_grid(), "{command:?} should leave the grid alone");
        }
        assert!(Command::Place(Role::Barrier).mutates_grid());
        assert!(Command::ResetAll.mutates_grid());
    }
}
