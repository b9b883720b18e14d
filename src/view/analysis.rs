//! Analysis panel: tabs over the run state and its result

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Tabs, Wrap},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{ActiveSection, AnalysisResult, AnalysisState, AnalysisTab, UiState};
use super::utils::{border_style, percent_bar};

const SCORE_BAR_WIDTH: usize = 16;

pub fn render_analysis_panel(
    frame: &mut Frame,
    area: Rect,
    analysis: &AnalysisState,
    has_resource: bool,
    ui_state: &UiState,
) {
    let is_focused = ui_state.active_section == ActiveSection::Analysis;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Analysis ")
        .border_style(border_style(is_focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tabs
            Constraint::Min(0),    // Tab body
        ])
        .split(inner);

    let titles: Vec<&str> = AnalysisTab::ALL.iter().map(|t| t.title()).collect();
    let tabs = Tabs::new(titles)
        .select(ui_state.analysis_tab.index())
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, chunks[0]);

    let body = Rect {
        y: chunks[1].y.saturating_add(1),
        height: chunks[1].height.saturating_sub(1),
        ..chunks[1]
    };

    if !has_resource {
        render_hint(frame, body, "Upload an audio file to analyze it.");
        return;
    }

    match ui_state.analysis_tab {
        AnalysisTab::Analysis => render_overview(frame, body, analysis),
        AnalysisTab::Genres => match analysis.result() {
            Some(result) => render_scores(frame, body, &result.genre_scores, Color::Magenta),
            None => render_hint(frame, body, "Run an analysis to see genre probabilities."),
        },
        AnalysisTab::Instruments => match analysis.result() {
            Some(result) => render_scores(frame, body, &result.instrument_scores, Color::Cyan),
            None => render_hint(frame, body, "Run an analysis to see detected instruments."),
        },
    }
}

fn render_hint(frame: &mut Frame, area: Rect, text: &str) {
    let hint = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true })
        .block(Block::default().padding(Padding::horizontal(1)));
    frame.render_widget(hint, area);
}

fn render_overview(frame: &mut Frame, area: Rect, analysis: &AnalysisState) {
    match analysis {
        AnalysisState::Idle => render_hint(frame, area, "Press 'a' to analyze the loaded file."),
        AnalysisState::Running { progress } => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
                .split(area);
            let label = Paragraph::new("Analyzing audio...")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().padding(Padding::horizontal(1)));
            frame.render_widget(label, chunks[0]);

            let gauge = Gauge::default()
                .gauge_style(Style::default().fg(Color::Yellow))
                .ratio((progress / 100.0).clamp(0.0, 1.0))
                .label(format!("{:.0}%", progress));
            frame.render_widget(gauge, chunks[1]);
        }
        AnalysisState::Complete(result) => render_result(frame, area, result),
        AnalysisState::Failed { message } => {
            let failed = Paragraph::new(vec![
                Line::from(Span::styled(
                    "Analysis failed",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(message.clone(), Style::default().fg(Color::Red))),
                Line::from(""),
                Line::from(Span::styled("Press 'a' to retry.", Style::default().fg(Color::DarkGray))),
            ])
            .wrap(Wrap { trim: false })
            .block(Block::default().padding(Padding::horizontal(1)));
            frame.render_widget(failed, area);
        }
    }
}

fn render_result(frame: &mut Frame, area: Rect, result: &AnalysisResult) {
    let field = |name: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{:<12}", name), Style::default().fg(Color::DarkGray)),
            Span::styled(value, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        ])
    };

    let lines = vec![
        field("Genre", result.genre.clone()),
        field("BPM", result.bpm.to_string()),
        field("Key", result.key.clone()),
        field("Mood", result.mood.clone()),
        field("Instruments", result.instruments.join(", ")),
        Line::from(""),
        Line::from(Span::styled(
            format!("Analyzed at {}", result.analyzed_at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().padding(Padding::horizontal(1)));
    frame.render_widget(paragraph, area);
}

fn render_scores(frame: &mut Frame, area: Rect, scores: &[(String, f64)], color: Color) {
    let lines: Vec<Line> = scores
        .iter()
        .map(|(name, score)| {
            Line::from(vec![
                Span::styled(format!("{:<12}", name), Style::default().fg(Color::White)),
                Span::styled(percent_bar(*score, SCORE_BAR_WIDTH), Style::default().fg(color)),
                Span::styled(format!(" {:>5.1}%", score), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(Block::default().padding(Padding::horizontal(1)));
    frame.render_widget(paragraph, area);
}
