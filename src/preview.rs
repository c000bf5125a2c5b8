//! Terminal preview of a capture.
//!
//! Draws one line chart per metric column with `ratatui`, laid out in a
//! grid, so a capture can be checked without opening the HTML report.
//!
//! # Controls
//!
//! - `q` or `Esc`: Quit
//! - `Ctrl+C`: Quit

use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame, Terminal,
};

use crate::capture::CaptureTable;

/// Colors cycled through the charts.
const PALETTE: [Color; 6] = [
    Color::Cyan,
    Color::Green,
    Color::Yellow,
    Color::Magenta,
    Color::Blue,
    Color::Red,
];

/// Check if stdout is connected to a terminal.
pub fn is_terminal() -> bool {
    unsafe { libc::isatty(libc::STDOUT_FILENO) != 0 }
}

/// Show the preview until the user quits.
pub fn run(table: &CaptureTable) -> std::io::Result<()> {
    enable_raw_mode()?;
    if let Err(e) = std::io::stdout().execute(EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e);
    }

    let result = run_loop(table);

    // Always clean up terminal state
    let _ = disable_raw_mode();
    let _ = std::io::stdout().execute(LeaveAlternateScreen);

    result
}

fn run_loop(table: &CaptureTable) -> std::io::Result<()> {
    let backend = CrosstermBackend::new(std::io::stdout());
    let mut terminal = Terminal::new(backend)?;

    loop {
        terminal.draw(|f| draw_preview(f, table))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(())
                    }
                    _ => {}
                }
            }
        }
    }
}

/// Rows and columns of a grid holding `count` charts.
fn grid(count: usize) -> (usize, usize) {
    let mut cols = 1;
    while cols * cols < count {
        cols += 1;
    }
    let rows = ((count + cols - 1) / cols).max(1);
    (rows, cols)
}

/// Draw every series of `table`.
fn draw_preview(f: &mut Frame, table: &CaptureTable) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(f.area());

    let status = Paragraph::new(format!(
        " {} series, {} samples | q: quit",
        table.headers.len(),
        table.rows.len()
    ))
    .style(Style::default().fg(Color::White).bg(Color::DarkGray));
    f.render_widget(status, chunks[0]);

    if table.headers.is_empty() {
        return;
    }

    let (rows, cols) = grid(table.headers.len());
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(chunks[1]);

    for (r, row_area) in row_areas.iter().enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, cols as u32); cols])
            .split(*row_area);

        for (c, cell) in cells.iter().enumerate() {
            let index = r * cols + c;
            let Some(title) = table.headers.get(index) else {
                return;
            };
            let data = table.series(index);
            draw_line_chart(f, *cell, title, &data, PALETTE[index % PALETTE.len()]);
        }
    }
}

/// Draw a single line chart.
fn draw_line_chart(f: &mut Frame, area: Rect, title: &str, data: &[(f64, f64)], color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(Span::styled(
            title.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));

    if data.is_empty() {
        f.render_widget(Paragraph::new("no data").block(block), area);
        return;
    }

    let min_y = data.iter().map(|(_, y)| *y).fold(f64::INFINITY, f64::min);
    let max_y = data.iter().map(|(_, y)| *y).fold(f64::NEG_INFINITY, f64::max);
    let y_range = if (max_y - min_y).abs() < 0.001 {
        (min_y - 1.0, max_y + 1.0)
    } else {
        (min_y, max_y)
    };
    let x_max = data.last().map(|(x, _)| *x).unwrap_or(0.0).max(1.0);

    let datasets = vec![Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(data)];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .labels(vec![
                    Span::raw(format!("{:.1}", y_range.0)),
                    Span::raw(format!("{:.1}", y_range.1)),
                ])
                .bounds([y_range.0, y_range.1]),
        );

    f.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;

    use super::*;

    #[test]
    fn grid_fits_all_charts() {
        assert_eq!(grid(1), (1, 1));
        assert_eq!(grid(3), (2, 2));
        assert_eq!(grid(4), (2, 2));
        assert_eq!(grid(14), (4, 4));
        assert_eq!(grid(0), (1, 1));
    }

    #[test]
    fn draws_titles_and_status() {
        let table = CaptureTable {
            headers: vec!["usr".into(), "read".into(), "temp".into()],
            rows: vec!["1,0,40".into(), "3,512,41".into(), "2,0,42".into()],
        };
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        terminal.draw(|f| draw_preview(f, &table)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("3 series, 3 samples"));
        assert!(text.contains("usr"));
        assert!(text.contains("read"));
        assert!(text.contains("temp"));
    }
}
