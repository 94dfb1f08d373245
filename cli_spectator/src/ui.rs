use std::collections::VecDeque;

use ratatui::layout::{Constraint, Direction, Layout, Margin};
use ratatui::prelude::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use spectator_core::{RenderDescriptor, RenderGrid, SpectatorFrame, StyleClass};

/// Terminal columns used by one board cell.
pub const CELL_WIDTH: usize = 4;

pub struct UiState {
    pub source: String,
    pub logs: VecDeque<String>,
    pub max_logs: usize,
    alert: Option<String>,
}

impl UiState {
    pub fn new(source: String, max_logs: usize) -> Self {
        Self {
            source,
            logs: VecDeque::new(),
            max_logs: max_logs.max(1),
            alert: None,
        }
    }

    pub fn push_log<S: Into<String>>(&mut self, line: S) {
        let mut text: String = line.into();
        while text.ends_with('\n') || text.ends_with('\r') {
            text.pop();
        }
        if text.is_empty() {
            return;
        }
        self.logs.push_front(text);
        while self.logs.len() > self.max_logs {
            self.logs.pop_back();
        }
    }

    pub fn raise_alert<S: Into<String>>(&mut self, message: S) {
        self.alert = Some(message.into());
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn alert_open(&self) -> bool {
        self.alert.is_some()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Rows for the log pane, borders included.
    pub fn log_pane_height(&self) -> u16 {
        let rows = self.max_logs.min(usize::from(u16::MAX - 2));
        rows as u16 + 2
    }
}

pub fn draw_ui(
    frame: &mut Frame,
    state: &UiState,
    view: Option<&SpectatorFrame>,
    frames_reduced: u64,
) {
    let log_height = state.log_pane_height();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(log_height),
        ])
        .split(frame.size());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(40)])
        .split(chunks[1]);

    draw_header(frame, chunks[0], state, frames_reduced);
    draw_board(frame, body[0], view);
    draw_leaderboard(frame, body[1], view);
    draw_logs(frame, chunks[2], state);

    if let Some(message) = state.alert() {
        let screen = frame.size();
        draw_alert(frame, screen, message);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, state: &UiState, frames_reduced: u64) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Territory Spectator");
    let line = Line::from(vec![
        Span::styled(state.source.clone(), Style::default().fg(Color::Green)),
        Span::raw(format!(" | frames {} | q to exit", frames_reduced)),
    ]);
    let text = Paragraph::new(line).wrap(Wrap { trim: true });
    frame.render_widget(block, area);
    frame.render_widget(
        text,
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}

fn draw_board(frame: &mut Frame, area: Rect, view: Option<&SpectatorFrame>) {
    let block = Block::default().borders(Borders::ALL).title("Board");
    let lines = match view {
        Some(view) => board_lines(&view.grid),
        None => vec![Line::from(Span::styled(
            "Waiting for the first snapshot...",
            Style::default().fg(Color::DarkGray),
        ))],
    };
    let paragraph = Paragraph::new(lines);
    frame.render_widget(block, area);
    frame.render_widget(
        paragraph,
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}

/// Each snapshot column becomes a band of two terminal lines: the first label
/// line on top, the second (usually the unit count) below.
pub fn board_lines(grid: &RenderGrid) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(grid.column_count() * 2);
    for column in grid.columns() {
        let mut top = Vec::with_capacity(column.len());
        let mut bottom = Vec::with_capacity(column.len());
        for descriptor in column {
            let style = cell_style(descriptor);
            let mut label = descriptor.lines();
            let first = label.next().unwrap_or("");
            let second = label.next().unwrap_or("");
            top.push(Span::styled(
                format!("{:^width$}", first, width = CELL_WIDTH),
                style,
            ));
            bottom.push(Span::styled(
                format!("{:^width$}", second, width = CELL_WIDTH),
                style,
            ));
        }
        lines.push(Line::from(top));
        lines.push(Line::from(bottom));
    }
    lines
}

fn cell_style(descriptor: &RenderDescriptor) -> Style {
    if let Some(fill) = descriptor.fill {
        Style::default()
            .bg(Color::Rgb(fill.r, fill.g, fill.b))
            .fg(Color::Black)
    } else if descriptor.has_class(StyleClass::Mountain) {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    } else if descriptor.has_class(StyleClass::NeutralTown) {
        Style::default().bg(Color::Gray).fg(Color::Black)
    } else {
        Style::default()
    }
}

fn draw_leaderboard(frame: &mut Frame, area: Rect, view: Option<&SpectatorFrame>) {
    let block = Block::default().borders(Borders::ALL).title("Leaderboard");
    let lines: Vec<Line> = view
        .map(|view| {
            view.leaderboard
                .iter()
                .map(|row| {
                    let color = row.color;
                    Line::from(Span::styled(
                        row.summary(),
                        Style::default()
                            .bg(Color::Rgb(color.r, color.g, color.b))
                            .fg(Color::Black),
                    ))
                })
                .collect()
        })
        .unwrap_or_default();
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(block, area);
    frame.render_widget(
        paragraph,
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}

fn draw_logs(frame: &mut Frame, area: Rect, state: &UiState) {
    let block = Block::default().borders(Borders::ALL).title("Logs");
    let lines: Vec<Line> = state
        .logs
        .iter()
        .map(|entry| Line::from(Span::raw(entry)))
        .collect();
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(block, area);
    frame.render_widget(
        paragraph,
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}

fn draw_alert(frame: &mut Frame, screen: Rect, message: &str) {
    let area = centered_rect(60, 7, screen);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title("Snapshot rejected");
    let lines = vec![
        Line::from(Span::styled(
            message.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter/Esc to dismiss and resume, q to exit",
            Style::default().fg(Color::Yellow),
        )),
    ];
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);
    frame.render_widget(
        paragraph,
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
