//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, TONE_MAX, TONE_MIN};
use crate::audio::MediaEngine;
use crate::config::{ControlsSettings, Settings};
use crate::session::Session;
use crate::transport::PlaybackState;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "select");
    map.insert("gg/G", "top/bottom");
    map.insert("enter", "play selected");
    map.insert("space/p", "play/pause");
    map.insert("s", "stop");
    map.insert("h/l", "prev/next");
    // H/L is filled dynamically from config.
    map.insert("+/-", "volume");
    map.insert("[/]", "speed");
    map.insert("1/2 3/4", "bass/treble");
    map.insert("o/O", "open file/folder");
    map.insert("d", "remove");
    map.insert("C", "clear");
    map.insert("m", "play mode");
    map.insert("z", "shuffle");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating the scrub step.
fn controls_text(controls: &ControlsSettings) -> String {
    let order = [
        "j/k", "enter", "space/p", "s", "h/l", "H/L", "+/-", "[/]", "1/2 3/4", "o/O", "d", "C",
        "m", "z", "gg/G", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}%", controls.scrub_percent))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render a `[-12, 12]` slider as a row of cells with a marker.
fn tone_slider(value: i8) -> String {
    (TONE_MIN..=TONE_MAX)
        .step_by(2)
        .map(|v| if v == value || v + 1 == value { '|' } else { '-' })
        .collect()
}

fn left_padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI into `frame`. Returns the area of the position bar,
/// which the event loop uses to map mouse drags to a fraction.
pub fn draw<E: MediaEngine>(
    frame: &mut Frame,
    app: &App,
    session: &Session<E>,
    settings: &Settings,
) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(settings.ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" legato ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let transport = session.transport.state();

    // Now playing
    {
        let mut lines: Vec<Line> = Vec::new();
        match session.current_entry() {
            Some(entry) => {
                lines.push(Line::from(entry.display_name().to_string()).bold());
                match session.current_file_info() {
                    Some(info) => lines.push(Line::from(format!(
                        "{} • {}",
                        info.size_label(),
                        info.modified_label()
                    ))),
                    None => lines.push(Line::from("File info unavailable")),
                }
            }
            None => {
                lines.push(Line::from("No file selected"));
                lines.push(Line::from(""));
            }
        }

        let state = match transport.playback {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        };
        let shuffle = if transport.shuffle { "Shuffle: ON" } else { "Shuffle: OFF" };
        let mut status = vec![
            state.to_string(),
            format!("Mode: {}", transport.play_mode.label()),
            shuffle.to_string(),
        ];
        if let Some(msg) = &app.status {
            status.push(msg.clone());
        }
        lines.push(Line::from(status.join(" • ")));

        let panel = Paragraph::new(lines)
            .block(left_padded(" now playing "))
            .wrap(Wrap { trim: true });
        frame.render_widget(panel, chunks[1]);
    }

    // Playlist
    {
        // Only build ListItems for the visible window, centered on the current entry.
        let playlist = &session.playlist;
        let total = playlist.len();
        let list_height = chunks[2].height.saturating_sub(2) as usize;
        let sel_pos = transport.current_index.filter(|&i| i < total);
        let anchor = sel_pos.unwrap_or(0);
        let (start, end) = if total <= list_height || list_height == 0 {
            (0, total)
        } else {
            let half = list_height / 2;
            let mut start = anchor.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height)
        };

        let width = chunks[2].width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = playlist
            .iter()
            .skip(start)
            .take(end - start)
            .map(|entry| {
                let duration = entry.duration().to_string();
                let name = entry.display_name();
                let gap = width
                    .saturating_sub(name.chars().count() + duration.chars().count() + 2)
                    .max(1);
                ListItem::new(format!("{name}{}{duration}", " ".repeat(gap)))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" playlist ({total}) ")),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        state.select(sel_pos.map(|i| i - start));
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    // Position bar
    let readout = session.transport.readout();
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" position "))
        .ratio(readout.fraction())
        .label(format!(
            "{} / {}",
            readout.position_label(),
            readout.total_label()
        ));
    frame.render_widget(gauge, chunks[3]);

    // Levels
    let levels = format!(
        "Volume {:>3}% • Speed {:.2}x • Bass {:+3} {} • Treble {:+3} {}",
        (transport.volume * 100.0).round() as u32,
        transport.speed,
        app.tone.bass,
        tone_slider(app.tone.bass),
        app.tone.treble,
        tone_slider(app.tone.treble),
    );
    frame.render_widget(Paragraph::new(levels).block(left_padded(" levels ")), chunks[4]);

    let footer = Paragraph::new(controls_text(&settings.controls))
        .block(left_padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);

    if let Some(prompt) = app.prompt() {
        let area = centered_rect_sized(72, 3, chunks[2]);
        frame.render_widget(Clear, area);
        let input = Paragraph::new(format!("{}_", prompt.buffer))
            .block(left_padded(prompt.kind.title()));
        frame.render_widget(input, area);
    }

    if let Some(message) = app.error() {
        let area = centered_rect_sized(64, 6, frame.area());
        frame.render_widget(Clear, area);
        let popup = Paragraph::new(message)
            .red()
            .block(left_padded(" error (any key closes) "))
            .wrap(Wrap { trim: true });
        frame.render_widget(popup, area);
    }

    chunks[3]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_text_mentions_scrub_step() {
        let text = controls_text(&ControlsSettings::default());
        assert!(text.contains("[H/L] scrub -/+5%"));
        assert!(text.starts_with("[j/k] select"));
        assert!(text.ends_with("[q] quit"));
    }

    #[test]
    fn tone_slider_marks_value() {
        assert_eq!(tone_slider(TONE_MIN), "|------------");
        assert_eq!(tone_slider(0), "------|------");
        assert_eq!(tone_slider(TONE_MAX), "------------|");
        assert_eq!(tone_slider(1), "------|------");
    }

    #[test]
    fn centered_rect_stays_inside() {
        let outer = Rect::new(0, 0, 40, 10);
        let r = centered_rect_sized(72, 6, outer);
        assert!(r.width <= 38);
        assert!(r.x + r.width <= outer.width);
        assert!(r.y + r.height <= outer.height);
    }
}
