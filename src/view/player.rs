//! Player bar rendering

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::model::{AudioResource, PlaybackState};
use super::utils::{border_style, format_time};

pub fn render_player_bar(
    frame: &mut Frame,
    area: Rect,
    resource: Option<&AudioResource>,
    playback: &PlaybackState,
    is_focused: bool,
) {
    let status_text = match resource {
        None => " No track loaded".to_string(),
        Some(resource) if playback.is_playing => format!(" ▶ {}", resource.name),
        Some(resource) => format!(" ⏸  {}", resource.name),
    };

    let volume_text = if playback.muted {
        "🔇 Muted".to_string()
    } else {
        format!("🔊 {}%", (playback.volume * 100.0).round() as u32)
    };
    let controls_info = format!(" ⏪ [  ◀◀ ←  ⏯ Space  → ▶▶  ] ⏩ | {} ", volume_text);

    let time_str = format!(
        "{} / {}",
        format_time(playback.current_time),
        format_time(playback.duration)
    );

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} ", status_text))
                .title_bottom(Line::from(controls_info).right_aligned())
                .border_style(border_style(is_focused)),
        )
        .gauge_style(if resource.is_some() {
            Style::default().fg(Color::Magenta)
        } else {
            Style::default().fg(Color::DarkGray)
        })
        .ratio(playback.progress_ratio())
        .label(time_str);

    frame.render_widget(gauge, area);
}
