//! Utility functions for rendering UI components

use ratatui::style::{Color, Style};

/// `m:ss`, with unknown or negative values shown as `0:00`
pub fn format_time(seconds: f64) -> String {
    let total_seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}", minutes, seconds)
}

pub fn format_size(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

/// Horizontal bar of block characters for a percentage
pub fn percent_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width.saturating_sub(filled)))
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(5.9), "0:05");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(3600.0), "60:00");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(-3.0), "0:00");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0.00 MB");
        assert_eq!(format_size(1024 * 1024 * 3 / 2), "1.50 MB");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short.mp3", 20), "short.mp3");
        assert_eq!(truncate_string("a_very_long_file_name.mp3", 10), "a_very_...");
    }

    #[test]
    fn test_percent_bar() {
        assert_eq!(percent_bar(50.0, 4), "██░░");
        assert_eq!(percent_bar(150.0, 3), "███");
        assert_eq!(percent_bar(0.0, 2), "░░");
    }
}
