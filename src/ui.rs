//! User interface rendering functions for the visualizer screen.

use color_eyre::eyre::{OptionExt as _, Result};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Block, BorderType, Borders, Clear, Paragraph,
    },
    Frame,
};

use crate::{
    grid::{CellState, Grid, Position},
    logging,
    types::Command,
    App,
};

/// Width of the side panel, in terminal cells.
const PANEL_WIDTH: u16 = 34;

/// Number of log messages shown in the side panel.
const LOG_LINES: usize = 8;

/// Cell states drawn on the canvas, in drawing order, with their color.
const LAYERS: [(CellState, Color); 7] = [
    (CellState::Visited, Color::Blue),
    (CellState::Open, Color::Green),
    (CellState::Closed, Color::Red),
    (CellState::Path, Color::Magenta),
    (CellState::Barrier, Color::White),
    (CellState::Start, Color::Yellow),
    (CellState::End, Color::Cyan),
];

/// Color of the cursor, drawn over every other layer.
const CURSOR_COLOR: Color = Color::LightRed;

/// Updates the application UI based on the persistent state.
///
/// This function splits the frame into the grid canvas, the side panel and the key hint bar and
/// renders each of them.
///
/// # Errors
///
/// This function may return errors from layout lookups or coordinate conversion failures.
pub(crate) fn draw(app: &App, frame: &mut Frame) -> Result<()> {
    clear(frame);

    let overall_layout = Layout::vertical([
        Constraint::Min(1),    // Grid and panel area
        Constraint::Length(3), // Tooltip block
    ])
    .split(frame.area());

    let content_area = *overall_layout
        .first()
        .ok_or_eyre("failed to get content area from layout")?;
    let tooltip_area = *overall_layout
        .last()
        .ok_or_eyre("failed to get tooltip area from layout")?;

    let content_layout =
        Layout::horizontal([Constraint::Min(1), Constraint::Length(PANEL_WIDTH)])
            .split(content_area);
    let grid_area = *content_layout
        .first()
        .ok_or_eyre("failed to get grid area from layout")?;
    let panel_area = *content_layout
        .last()
        .ok_or_eyre("failed to get panel area from layout")?;

    grid_canvas(app, frame, grid_area)?;
    panel(app, frame, panel_area)?;
    tooltip(frame, tooltip_area);

    Ok(())
}

/// Clears the terminal screen by rendering a [`Clear`] widget.
///
/// This function renders a clear widget over the entire area of the frame to prepare for
/// rendering new content without artifacts from previous buffers rendered on the same frame.
pub(crate) fn clear(frame: &mut Frame) {
    let clear = Clear;
    frame.render_widget(clear, frame.area());
}

/// Renders the grid centered in `area`, one terminal cell per grid cell.
///
/// Each cell state gets its own [`Points`] layer so the canvas only receives the non-empty cells.
/// Grids larger than the area are clipped by the layout.
///
/// # Errors
///
/// This function may return errors from coordinate conversion operations.
pub(crate) fn grid_canvas(app: &App, frame: &mut Frame, area: Rect) -> Result<()> {
    let grid = app.session.grid();
    let side = u16::try_from(grid.size())?;

    let block = Block::bordered()
        .title(format!(" {0}x{0} ", grid.size()))
        .title_alignment(Alignment::Center)
        .style(Color::Green)
        .border_type(BorderType::Rounded);

    let inner = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(side.saturating_add(2)),
        Constraint::Min(0),
    ])
    .split(area)
    .get(1)
    .copied()
    .ok_or_eyre("failed to get grid rows from layout")?;
    let framed = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(side.saturating_add(2)),
        Constraint::Min(0),
    ])
    .split(inner)
    .get(1)
    .copied()
    .ok_or_eyre("failed to get grid columns from layout")?;

    let space = block.inner(framed);
    frame.render_widget(block, framed);

    // Pre-compute screen coordinates to handle errors before the paint closure
    let mut layers = Vec::with_capacity(LAYERS.len() + 1);
    for (state, color) in LAYERS {
        let cells: Vec<Position> = grid
            .cells()
            .iter()
            .filter(|cell| cell.state() == state)
            .map(|cell| cell.position())
            .collect();
        layers.push((transform_grid_to_screen_coords(&cells, grid)?, color));
    }
    layers.push((
        transform_grid_to_screen_coords(&[app.cursor], grid)?,
        CURSOR_COLOR,
    ));

    let canvas = Canvas::default()
        .x_bounds([
            (-rounded_div::i32(space.width.into(), 2)).into(),
            (rounded_div::i32(space.width.into(), 2)).into(),
        ])
        .y_bounds([
            (-rounded_div::i32(space.height.into(), 2)).into(),
            (rounded_div::i32(space.height.into(), 2)).into(),
        ])
        .marker(Marker::Block)
        .paint(|ctx| {
            for (coords, color) in &layers {
                ctx.draw(&Points {
                    coords,
                    color: *color,
                });
            }
        });

    frame.render_widget(canvas, space);

    Ok(())
}

/// Renders the settings, metrics and log side panel.
///
/// # Errors
///
/// This function may return errors from layout lookups.
pub(crate) fn panel(app: &App, frame: &mut Frame, area: Rect) -> Result<()> {
    let session = &app.session;

    let layout = Layout::vertical([Constraint::Length(14), Constraint::Min(3)]).split(area);
    let status_area = *layout
        .first()
        .ok_or_eyre("failed to get status area from layout")?;
    let log_area = *layout
        .last()
        .ok_or_eyre("failed to get log area from layout")?;

    let activity = if session.is_searching() {
        "searching"
    } else if session.is_generating() {
        "generating maze"
    } else {
        "idle"
    };
    let under_cursor = session
        .cell_at(app.cursor.row, app.cursor.col)
        .unwrap_or_default();

    let mut lines = vec![
        entry("algorithm", session.algorithm().to_string()),
        entry(
            "diagonal",
            if session.diagonal() { "on" } else { "off" }.to_owned(),
        ),
        entry("density", format!("{:.2}", session.density())),
        entry(
            "delay",
            format!("{} ms", app.animation_manager.delay().as_millis()),
        ),
        entry("state", activity.to_owned()),
        entry("cursor", format!("{} {under_cursor:?}", app.cursor)),
        Line::raw(""),
    ];
    match session.metrics() {
        Some(metrics) => {
            lines.push(entry("visited", metrics.nodes_visited.to_string()));
            lines.push(entry(
                "path",
                if metrics.path_length == 0 {
                    "not found".to_owned()
                } else {
                    metrics.path_length.to_string()
                },
            ));
            lines.push(entry(
                "time",
                format!("{:.3} ms", metrics.elapsed.as_secs_f64() * 1000.),
            ));
        }
        None => lines.push(Line::styled("no completed run", Color::DarkGray)),
    }

    let status = Paragraph::new(lines).block(
        Block::bordered()
            .title("Status")
            .title_alignment(Alignment::Center)
            .style(Color::Green)
            .border_type(BorderType::Rounded),
    );
    frame.render_widget(status, status_area);

    let messages: Vec<Line<'_>> = logging::logger()
        .recent(LOG_LINES)
        .into_iter()
        .map(|message| {
            let color = match message.level {
                log::Level::Error => Color::Red,
                log::Level::Warn => Color::Yellow,
                log::Level::Info => Color::White,
                log::Level::Debug => Color::Blue,
                log::Level::Trace => Color::Gray,
            };
            Line::styled(message.text, color)
        })
        .collect();
    let log_panel = Paragraph::new(messages).block(
        Block::bordered()
            .title("Log")
            .title_alignment(Alignment::Center)
            .style(Color::Green)
            .border_type(BorderType::Rounded),
    );
    frame.render_widget(log_panel, log_area);

    Ok(())
}

/// Renders the key hint bar as a block with a top border.
pub(crate) fn tooltip(frame: &mut Frame, area: Rect) {
    let hints = Command::HINTS
        .iter()
        .map(|(key, action)| format!("({key}) {action}"))
        .collect::<Vec<_>>()
        .join(" / ");

    let tooltip_block = Block::bordered()
        .title(hints)
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green))
        .border_type(BorderType::Plain)
        .borders(Borders::TOP);

    frame.render_widget(tooltip_block, area);
}

/// Builds a `label: value` line for the side panel.
fn entry(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:>10}: "), Color::DarkGray),
        Span::styled(value, Color::White),
    ])
}

/// Transforms grid positions to screen coordinates for canvas rendering.
///
/// This function converts grid positions (row, col) to screen coordinates (x, y) using the
/// standard transformation formulas: coordinate[i] = (n - 1) / 2 - i for rows (ascending order) and
/// coordinate[i] = i - (n - 1) / 2 for columns (descending order).
///
/// # Errors
///
/// This function may return errors from coordinate conversion operations.
pub(crate) fn transform_grid_to_screen_coords(
    positions: &[Position],
    grid: &Grid,
) -> Result<Vec<(f64, f64)>> {
    let side = f64::from(u16::try_from(grid.size())?);

    positions
        .iter()
        .map(|position| {
            // Row transformation: coordinate[i] = (n - 1) / 2 - i
            let screen_y = (side - 1.) / 2. - f64::from(u16::try_from(position.row)?);

            // Column transformation: coordinate[i] = i - (n - 1) / 2
            let screen_x = f64::from(u16::try_from(position.col)?) - (side - 1.) / 2.;

            Ok((screen_x, screen_y))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{grid::Role, search::Algorithm, Config};
    use ratatui::{backend::TestBackend, Terminal};

    /// Creates a small seeded app for UI testing.
    fn create_test_app(size: usize) -> App {
        let config = Config {
            size,
            seed: Some(1),
            ..Config::default()
        };
        App::new(&config).expect("failed to create app")
    }

    /// Creates a test terminal with known dimensions for UI testing.
    fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        Terminal::new(backend).expect("failed to create test terminal")
    }

    /// Concatenates every symbol of the rendered buffer.
    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_draw_idle_app() {
        let app = create_test_app(10);
        let mut terminal = create_test_terminal(80, 24);

        let result = terminal.draw(|frame| {
            draw(&app, frame).expect("drawing should succeed in test");
        });

        assert!(result.is_ok(), "drawing an idle app should succeed");
        let text = buffer_text(&terminal);
        assert!(text.contains("A*"));
        assert!(text.contains("no completed run"));
    }

    #[test]
    fn test_draw_after_completed_run() {
        let mut app = create_test_app(10);
        app.session
            .place(Position::new(0, 0), Role::Start)
            .expect("start placement should succeed");
        app.session
            .place(Position::new(9, 9), Role::End)
            .expect("end placement should succeed");
        app.session
            .run_search(Algorithm::Bfs)
            .expect("search should start");
        while app.session.is_busy() {
            let _ = app.session.step();
        }
        let mut terminal = create_test_terminal(80, 24);

        let result = terminal.draw(|frame| {
            draw(&app, frame).expect("drawing should succeed in test");
        });

        assert!(result.is_ok(), "drawing a finished run should succeed");
        assert!(buffer_text(&terminal).contains("18"));
    }

    #[test]
    fn test_draw_mid_generation() {
        let mut app = create_test_app(20);
        app.session
            .generate_selected()
            .expect("generation should start");
        for _ in 0..4 {
            let _ = app.session.step();
        }
        let mut terminal = create_test_terminal(80, 30);

        let result = terminal.draw(|frame| {
            draw(&app, frame).expect("drawing should succeed in test");
        });

        assert!(result.is_ok(), "drawing mid-generation should succeed");
        assert!(buffer_text(&terminal).contains("generating maze"));
    }

    #[test]
    fn test_draw_in_tiny_terminal() {
        let app = create_test_app(40);
        let mut terminal = create_test_terminal(20, 6);

        let result = terminal.draw(|frame| {
            draw(&app, frame).expect("drawing should succeed in a tiny terminal");
        });

        assert!(result.is_ok(), "a grid larger than the terminal should be clipped");
    }

    #[test]
    fn test_clear_function() {
        let mut terminal = create_test_terminal(80, 24);

        let result = terminal.draw(|frame| {
            clear(frame);
        });

        assert!(result.is_ok(), "clearing screen should succeed");
    }

    #[test]
    fn test_transform_centers_grid() {
        let grid = Grid::new(5).expect("failed to create grid");

        let coords = transform_grid_to_screen_coords(
            &[
                Position::new(0, 0),
                Position::new(2, 2),
                Position::new(4, 3),
            ],
            &grid,
        )
        .expect("transform should succeed");

        assert_eq!(coords, [(-2., 2.), (0., 0.), (1., -2.)]);
    }

    #[test]
    fn test_layers_cover_every_drawn_state() {
        for state in [
            CellState::Barrier,
            CellState::Start,
            CellState::End,
            CellState::Open,
            CellState::Closed,
            CellState::Path,
            CellState::Visited,
        ] {
            assert!(
                LAYERS.iter().any(|(layer, _)| *layer == state),
                "{state:?} should have a layer"
            );
        }
        assert!(LAYERS.iter().all(|(layer, _)| *layer != CellState::Empty));
    }
}
