//! Overlay rendering (notification toast, help popup)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::model::{Notification, NotificationKind};

pub fn render_notification(frame: &mut Frame, notification: &Notification) {
    let area = frame.area();

    // Toast in the top-right corner, below the header
    let popup_width = 48.min(area.width.saturating_sub(2));
    let inner_width = popup_width.saturating_sub(2).max(1) as usize;
    let line_count = ((notification.description.chars().count() as f32) / (inner_width as f32)).ceil() as u16;
    let popup_height = (2 + line_count.max(1)).min(area.height.saturating_sub(2));

    let popup_area = Rect {
        x: area.width.saturating_sub(popup_width + 1),
        y: 3.min(area.height.saturating_sub(popup_height)),
        width: popup_width,
        height: popup_height,
    };

    let color = match notification.kind {
        NotificationKind::Success => Color::Green,
        NotificationKind::Error => Color::Red,
    };

    // Clear the area behind the popup first
    frame.render_widget(Clear, popup_area);

    let toast = Paragraph::new(notification.description.clone())
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(format!(" {} ", notification.title))
                .title_bottom(Line::from(" Esc ").right_aligned())
                .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(toast, popup_area);
}

pub fn render_help_popup(frame: &mut Frame) {
    let area = frame.area();

    // Define keybindings organized by category
    let keybindings = vec![
        ("", "── Navigation ──"),
        ("Tab / Shift+Tab", "Cycle sections"),
        ("", ""),
        ("", "── Upload ──"),
        ("Type + Enter", "Load the typed path"),
        ("Esc", "Clear the path"),
        ("Drag & drop", "Load the dropped file"),
        ("", ""),
        ("", "── Playback ──"),
        ("Space", "Play / Pause"),
        ("← / →", "Seek 5s back / forward"),
        ("[ / ]", "Skip 10s back / forward"),
        ("Home / End", "Jump to start / end"),
        ("+ / -", "Volume up / down"),
        ("M", "Mute / Unmute"),
        ("", ""),
        ("", "── Analysis ──"),
        ("A", "Analyze audio"),
        ("1 / 2 / 3", "Analysis / Genres / Instruments"),
        ("← / →", "Switch tab (analysis panel)"),
        ("", ""),
        ("", "── General ──"),
        ("Esc", "Dismiss notification"),
        ("H", "Toggle this help"),
        ("Q", "Quit (Ctrl+Q in upload field)"),
    ];

    let popup_width = 62.min(area.width);
    let popup_height = (keybindings.len() as u16 + 2).min(area.height.saturating_sub(2));

    let popup_x = area.width.saturating_sub(popup_width) / 2;
    let popup_y = area.height.saturating_sub(popup_height) / 2;

    let popup_area = Rect {
        x: popup_x,
        y: popup_y,
        width: popup_width,
        height: popup_height,
    };

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                // Section header or empty line
                Line::from(Span::styled(
                    format!("{:^38}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (H or Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}
