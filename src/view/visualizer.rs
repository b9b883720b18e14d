//! Waveform bars and frequency circles

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        Block, Borders, Paragraph,
    },
    Frame,
};

use crate::model::{VisualState, Waveform};

/// Circle `size` is in pixels of a 500px reference square
const CIRCLE_REFERENCE_PX: f64 = 500.0;

pub fn render_waveform(frame: &mut Frame, area: Rect, visual: &VisualState, is_playing: bool) {
    let block = Block::default().borders(Borders::ALL).title(" Waveform ");

    let message = match &visual.waveform {
        Waveform::Empty => Some("Upload an audio file to see its waveform"),
        Waveform::Loading => Some("Loading waveform..."),
        Waveform::Ready(_) => None,
    };
    if let Some(message) = message {
        let placeholder = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let heights = visual.bar_heights(is_playing);
    let count = heights.len().max(1) as f64;
    let color = if is_playing { Color::Magenta } else { Color::Blue };

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Block)
        .x_bounds([0.0, count])
        .y_bounds([0.0, 1.0])
        .paint(move |ctx| {
            for (i, height) in heights.iter().enumerate() {
                let x = i as f64 + 0.5;
                ctx.draw(&CanvasLine {
                    x1: x,
                    y1: 0.0,
                    x2: x,
                    y2: *height,
                    color,
                });
            }
        });
    frame.render_widget(canvas, area);
}

/// Color standing in for the circle's opacity
fn circle_color(opacity: f64) -> Color {
    if opacity >= 0.85 {
        Color::LightMagenta
    } else if opacity >= 0.6 {
        Color::Magenta
    } else {
        Color::DarkGray
    }
}

pub fn render_frequency_circles(frame: &mut Frame, area: Rect, visual: &VisualState, is_playing: bool) {
    let block = Block::default().borders(Borders::ALL).title(" Frequencies ");

    if visual.circles.is_empty() {
        let placeholder = Paragraph::new("No frequency data")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let circles: Vec<Circle> = visual
        .circles
        .iter()
        .map(|circle| {
            let scale = visual.circle_scale(circle, is_playing);
            Circle {
                x: circle.x,
                y: circle.y,
                radius: circle.size / CIRCLE_REFERENCE_PX * scale,
                color: circle_color(visual.circle_opacity(circle, is_playing)),
            }
        })
        .collect();

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, 1.0])
        .y_bounds([0.0, 1.0])
        .paint(move |ctx| {
            for circle in &circles {
                ctx.draw(circle);
            }
        });
    frame.render_widget(canvas, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_color_tracks_opacity() {
        assert_eq!(circle_color(0.5), Color::DarkGray);
        assert_eq!(circle_color(0.7), Color::Magenta);
        assert_eq!(circle_color(1.0), Color::LightMagenta);
    }
}
