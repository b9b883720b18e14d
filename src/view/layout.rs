//! Layout rendering (header, upload panel)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{ActiveSection, AudioResource, UiState};
use super::utils::{border_style, format_size, truncate_string};

/// Matches the symphonia container features
const SUPPORTED_FORMATS_HINT: &str = "Supported formats: MP3, WAV, FLAC, OGG";

pub fn render_header(frame: &mut Frame, area: Rect, resource: Option<&AudioResource>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(16), // Title
            Constraint::Min(0),     // Loaded file
        ])
        .split(area);

    let title = Paragraph::new(Span::styled(
        "♫ AudioViz",
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().borders(Borders::ALL).padding(Padding::horizontal(1)));
    frame.render_widget(title, chunks[0]);

    let file_line = match resource {
        Some(resource) => {
            let name_width = (chunks[1].width as usize).saturating_sub(30);
            Line::from(vec![
                Span::styled(
                    truncate_string(&resource.name, name_width.max(8)),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    format!("  {} · {}", resource.mime_type, format_size(resource.size_bytes)),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        }
        None => Line::from(Span::styled("No file loaded", Style::default().fg(Color::DarkGray))),
    };
    let file = Paragraph::new(file_line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" File ")
            .title_bottom(Line::from(" h: help ").right_aligned())
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(file, chunks[1]);
}

pub fn render_upload_panel(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let is_focused = ui_state.active_section == ActiveSection::Upload;

    let first_line = if ui_state.path_input.is_empty() {
        Line::from(Span::styled(
            if is_focused { "Type a path and press Enter..." } else { "Drop an audio file here" },
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let cursor = if is_focused { "▏" } else { "" };
        Line::from(vec![
            Span::styled(ui_state.path_input.clone(), Style::default().fg(Color::White)),
            Span::styled(cursor, Style::default().fg(Color::Green)),
        ])
    };
    let lines = vec![
        first_line,
        Line::from(Span::styled(SUPPORTED_FORMATS_HINT, Style::default().fg(Color::DarkGray))),
    ];

    let upload = Paragraph::new(lines)
        .style(if is_focused {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::White)
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Upload ")
                .padding(Padding::horizontal(1))
                .border_style(border_style(is_focused)),
        );
    frame.render_widget(upload, area);
}
