//! Key and paste event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::{ActiveSection, AnalysisTab};
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let mut model = self.model.lock().await;

        // Help popup swallows everything but its close keys
        if model.is_help_popup_open() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H')) {
                model.hide_help_popup();
            }
            return Ok(());
        }

        // A visible notification is dismissed by Esc; other keys pass through
        if model.has_notification() && key.code == KeyCode::Esc {
            model.clear_notification();
            return Ok(());
        }

        let active_section = model.ui_state().active_section;

        // Upload field takes text input
        if active_section == ActiveSection::Upload {
            match key.code {
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        model.cycle_section_backward();
                    } else {
                        model.cycle_section_forward();
                    }
                    return Ok(());
                }
                KeyCode::BackTab => {
                    model.cycle_section_backward();
                    return Ok(());
                }
                KeyCode::Enter => {
                    drop(model);
                    // Rejections are surfaced as a notification
                    let _ = self.submit_path_input().await;
                    return Ok(());
                }
                KeyCode::Esc => {
                    model.clear_path();
                    return Ok(());
                }
                KeyCode::Backspace => {
                    model.backspace_path();
                    return Ok(());
                }
                KeyCode::Char(c) => {
                    // Q still quits in the upload field when Ctrl is pressed
                    if (c == 'q' || c == 'Q') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        model.set_should_quit(true);
                        return Ok(());
                    }
                    model.append_to_path(c);
                    return Ok(());
                }
                _ => {}
            }
        }

        // Arrows switch result tabs while the analysis panel has focus
        if active_section == ActiveSection::Analysis {
            match key.code {
                KeyCode::Left => {
                    model.prev_analysis_tab();
                    return Ok(());
                }
                KeyCode::Right => {
                    model.next_analysis_tab();
                    return Ok(());
                }
                _ => {}
            }
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true);
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    model.cycle_section_backward();
                } else {
                    model.cycle_section_forward();
                }
            }
            KeyCode::BackTab => {
                model.cycle_section_backward();
            }
            // Play/Pause toggle
            KeyCode::Char(' ') => {
                drop(model);
                self.toggle_playback().await;
            }
            KeyCode::Left => {
                drop(model);
                self.seek_backward().await;
            }
            KeyCode::Right => {
                drop(model);
                self.seek_forward().await;
            }
            // Jump to the start or the end of the track
            KeyCode::Home => {
                drop(model);
                self.seek_to(0.0).await;
            }
            KeyCode::End => {
                drop(model);
                self.seek_to(f64::MAX).await;
            }
            KeyCode::Char('[') => {
                drop(model);
                self.skip_back().await;
            }
            KeyCode::Char(']') => {
                drop(model);
                self.skip_forward().await;
            }
            // Volume up
            KeyCode::Char('+') | KeyCode::Char('=') => {
                drop(model);
                self.volume_up().await;
            }
            // Volume down
            KeyCode::Char('-') => {
                drop(model);
                self.volume_down().await;
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                drop(model);
                self.toggle_mute().await;
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                drop(model);
                self.analyze().await;
            }
            KeyCode::Char('1') => model.set_analysis_tab(AnalysisTab::Analysis),
            KeyCode::Char('2') => model.set_analysis_tab(AnalysisTab::Genres),
            KeyCode::Char('3') => model.set_analysis_tab(AnalysisTab::Instruments),
            // Show help popup
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.show_help_popup();
            }
            _ => {}
        }
        Ok(())
    }

    /// A paste is how terminals deliver a dropped file; load it directly.
    pub async fn handle_paste(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }
        self.model.lock().await.clear_path();
        // Rejections are surfaced as a notification
        let _ = self.load_file(text).await;
        Ok(())
    }
}
