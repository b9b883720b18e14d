//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared formatting helpers
//! - `layout`: Header and upload panel
//! - `player`: Player bar with the time gauge
//! - `visualizer`: Waveform bars and frequency circles
//! - `analysis`: Analysis panel and its tabs
//! - `overlays`: Notification toast and help popup

mod utils;
mod layout;
mod player;
mod visualizer;
mod analysis;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{ActiveSection, ViewSnapshot};

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, snapshot: &ViewSnapshot) {
        let ui_state = &snapshot.ui;
        let is_playing = snapshot.playback.is_playing;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title + loaded file
                Constraint::Min(0),    // Panels
                Constraint::Length(3), // Player bar
            ])
            .split(frame.area());

        layout::render_header(frame, chunks[0], snapshot.resource.as_ref());

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40), // Upload + analysis
                Constraint::Percentage(60), // Visualizers
            ])
            .split(chunks[1]);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(main_chunks[0]);
        layout::render_upload_panel(frame, left[0], ui_state);
        analysis::render_analysis_panel(
            frame,
            left[1],
            &snapshot.analysis,
            snapshot.resource.is_some(),
            ui_state,
        );

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(main_chunks[1]);
        visualizer::render_waveform(frame, right[0], &snapshot.visual, is_playing);
        visualizer::render_frequency_circles(frame, right[1], &snapshot.visual, is_playing);

        player::render_player_bar(
            frame,
            chunks[2],
            snapshot.resource.as_ref(),
            &snapshot.playback,
            ui_state.active_section == ActiveSection::Player,
        );

        if let Some(notification) = &ui_state.notification {
            overlays::render_notification(frame, notification);
        }

        // Help popup overlay (if open)
        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AppModel;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered_text(snapshot: &ViewSnapshot) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| AppView::render(f, snapshot)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_empty_state_renders_prompts() {
        let model = AppModel::new(0.75);
        let text = rendered_text(&model.snapshot());

        assert!(text.contains("AudioViz"));
        assert!(text.contains("No file loaded"));
        assert!(text.contains("Supported formats: MP3, WAV, FLAC, OGG"));
        assert!(text.contains("0:00 / 0:00"));
    }

    fn loaded_model() -> AppModel {
        let mut model = AppModel::new(0.75);
        model.replace_resource(
            "song.mp3".to_string(),
            std::path::Path::new("song.mp3"),
            2 * 1024 * 1024,
            "audio/mpeg".to_string(),
        );
        model
    }

    #[test]
    fn test_loaded_state_shows_file_and_loading_waveform() {
        let text = rendered_text(&loaded_model().snapshot());
        assert!(text.contains("song.mp3"));
        assert!(text.contains("2.00 MB"));
        assert!(text.contains("Loading waveform"));
        assert!(text.contains("Press 'a' to analyze"));
    }

    #[tokio::test]
    async fn test_overlays_render_on_top() {
        let mut model = loaded_model();
        model.notify_success("File uploaded successfully", "song.mp3 (2.00 MB)".to_string());
        assert!(rendered_text(&model.snapshot()).contains("File uploaded successfully"));

        model.clear_notification();
        model.show_help_popup();
        assert!(rendered_text(&model.snapshot()).contains("Help (H or Esc to close)"));
    }
}
