//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::App;
use crate::config::{Settings, TimeField, UiSettings};
use crate::editor::{Draft, DraftTarget, Field};
use crate::library::{KeyValueStorage, format_clock};
use crate::lyrics::LyricsPanel;
use crate::playback::{MediaHandle, PlaybackState};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next song");
    // H/L is filled dynamically from config.
    map.insert("+/-", "volume");
    map.insert("m", "mute");
    map.insert("s", "shuffle");
    map.insert("r", "repeat mode");
    map.insert("v", "lyrics");
    map.insert("f", "like");
    map.insert("b", "library");
    map.insert("q", "quit");
    map
});

static LIBRARY_CONTROLS: &str = "[j/k] move | [enter] select | [a] add | [e] edit | [d] delete | [esc] close";
static FORM_CONTROLS: &str =
    "[tab] next field | [enter] attach file / new line in lyrics | [ctrl+s] save | [esc] cancel";

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = ["space/p", "h/l", "H/L", "+/-", "m", "s", "r", "v", "f", "b", "q"];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{scrub_seconds}s"))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{k}] {v}"))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Build the progress label (elapsed/total/remaining) per `UiSettings`.
fn time_text(elapsed: Duration, total: Duration, ui: &UiSettings) -> String {
    ui.time_fields
        .iter()
        .map(|f| match f {
            TimeField::Elapsed => format_clock(elapsed),
            TimeField::Total => format_clock(total),
            TimeField::Remaining => format!("-{}", format_clock(total.saturating_sub(elapsed))),
        })
        .collect::<Vec<_>>()
        .join(&ui.time_separator)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn padded(title: &str) -> Block<'_> {
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

/// Screen regions that react to the mouse.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hitboxes {
    /// Inner area of the progress bar (borders excluded).
    pub progress: Rect,
}

impl Hitboxes {
    /// Map a click at (`column`, `row`) to `(offset, width)` within the progress bar.
    pub fn progress_click(&self, column: u16, row: u16) -> Option<(u16, u16)> {
        let p = self.progress;
        let inside = p.width > 0
            && column >= p.x
            && column < p.x + p.width
            && row >= p.y
            && row < p.y + p.height;
        inside.then(|| (column - p.x, p.width))
    }
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw<S: KeyValueStorage, M: MediaHandle>(
    frame: &mut Frame,
    app: &App<S, M>,
    settings: &Settings,
) -> Hitboxes {
    let ui_settings = &settings.ui;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" encore ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    draw_now_playing(frame, app, chunks[1]);

    // Progress
    let progress_block = Block::default().borders(Borders::ALL).title(" progress ");
    let progress_inner = progress_block.inner(chunks[2]);
    let label = time_text(app.player.position(), app.player.duration(), ui_settings);
    let gauge = Gauge::default()
        .block(progress_block)
        .gauge_style(Style::default().add_modifier(Modifier::BOLD))
        .ratio(app.player.progress())
        .label(label);
    frame.render_widget(gauge, chunks[2]);

    if app.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from("Your library is empty."),
            Line::from(""),
            Line::from("Press [b] then [a] to add a track."),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" library "));
        frame.render_widget(empty, chunks[3]);
    } else {
        draw_lyrics(frame, app.lyrics(), chunks[3]);
    }

    // Status line
    let status = Paragraph::new(app.status.as_deref().unwrap_or(""))
        .block(padded(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[4]);

    let footer = Paragraph::new(controls_text(settings.controls.scrub_seconds))
        .block(padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);

    if app.library_open {
        draw_library(frame, app);
    }

    Hitboxes {
        progress: progress_inner,
    }
}

fn draw_now_playing<S: KeyValueStorage, M: MediaHandle>(
    frame: &mut Frame,
    app: &App<S, M>,
    area: Rect,
) {
    let player = &app.player;
    let state = match player.state() {
        PlaybackState::Empty => "Empty",
        PlaybackState::Idle if player.is_pending() => "Starting",
        PlaybackState::Idle => "Paused",
        PlaybackState::Playing => "Playing",
        PlaybackState::Ended => "Ended",
    };
    let volume = if player.volume().is_muted() {
        "Vol: muted".to_string()
    } else {
        format!("Vol: {:.0}%", player.volume().level() * 100.0)
    };
    let modes = [
        state.to_string(),
        format!("Shuffle: {}", if player.shuffle() { "ON" } else { "OFF" }),
        player.repeat().label().to_string(),
        volume,
    ]
    .join(" • ");

    let mut lines = Vec::new();
    match app.current_track() {
        Some(track) => {
            let mut title = vec![Span::raw(track.title.clone()).bold()];
            if app.liked {
                title.push(Span::raw(" ♥").red());
            }
            lines.push(Line::from(title));
            lines.push(Line::from(format!("{} • {}", track.artist, track.album)));
        }
        None => {
            lines.push(Line::from("No track"));
            lines.push(Line::from(""));
        }
    }
    lines.push(Line::from(modes));

    let now_playing = Paragraph::new(lines).block(padded(" now playing "));
    frame.render_widget(now_playing, area);
}

fn draw_lyrics(frame: &mut Frame, panel: LyricsPanel<'_>, area: Rect) {
    match panel {
        LyricsPanel::Collapsed => {
            let hint = Paragraph::new("Press [v] to show lyrics")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(" lyrics "));
            frame.render_widget(hint, area);
        }
        LyricsPanel::Expanded {
            english,
            portuguese,
        } => {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(area);
            let en = Paragraph::new(english)
                .block(padded(" English "))
                .wrap(Wrap { trim: false });
            let pt = Paragraph::new(portuguese)
                .block(padded(" Português "))
                .wrap(Wrap { trim: false });
            frame.render_widget(en, cols[0]);
            frame.render_widget(pt, cols[1]);
        }
    }
}

fn draw_library<S: KeyValueStorage, M: MediaHandle>(
    frame: &mut Frame,
    app: &App<S, M>,
) {
    let popup = centered_rect_sized(80, 20, frame.area());
    frame.render_widget(Clear, popup);

    if let Some(draft) = app.editor.draft() {
        draw_form(frame, draft, app.editor.can_submit(), popup);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(popup);

    let current = app.current_track().map(|t| t.id);
    let items: Vec<ListItem> = app
        .tracks()
        .iter()
        .map(|t| {
            let marker = if Some(t.id) == current { "♪ " } else { "  " };
            let audio = if t.has_audio() { "" } else { " (no audio)" };
            ListItem::new(format!("{marker}{} [{}]{audio}", t.display(), t.duration))
        })
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" library "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !app.tracks().is_empty() {
        state.select(Some(app.selected));
    }
    frame.render_stateful_widget(list, rows[0], &mut state);
    frame.render_widget(Paragraph::new(LIBRARY_CONTROLS).dim(), rows[1]);
}

fn draw_form(frame: &mut Frame, draft: &Draft, can_submit: bool, area: Rect) {
    let title = match draft.target() {
        DraftTarget::New => " add track ",
        DraftTarget::Existing(_) => " edit track ",
    };

    let mut lines: Vec<Line> = Vec::new();
    for field in Field::ALL {
        let focused = draft.focus() == field;
        let label = format!("{:>12}: ", field.label());
        let label = if focused {
            Span::raw(label).bold()
        } else {
            Span::raw(label)
        };
        let text = draft.text(field);
        let mut value_lines = text.split('\n');
        let first = value_lines.next().unwrap_or("");
        let cursor = if focused { "▏" } else { "" };
        let mut spans = vec![label, Span::raw(first.to_string())];
        let rest: Vec<&str> = value_lines.collect();
        if rest.is_empty() {
            spans.push(Span::raw(cursor));
        }
        lines.push(Line::from(spans));
        let last = rest.len();
        for (i, l) in rest.into_iter().enumerate() {
            let tail = if i + 1 == last { cursor } else { "" };
            lines.push(Line::from(format!("{:>14}{l}{tail}", "")));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "{:>12}: {}",
        "Duration",
        if draft.fields().duration.is_empty() {
            "-"
        } else {
            draft.fields().duration.as_str()
        }
    )));
    let missing = draft.missing();
    let ready = if can_submit {
        Line::from("Ready to save".green())
    } else if draft.target() == DraftTarget::New {
        Line::from(format!("Missing: {}", missing.join(", ")).yellow())
    } else {
        Line::from("")
    };
    lines.push(ready);
    lines.push(Line::from(FORM_CONTROLS).dim());

    let form = Paragraph::new(lines)
        .block(padded(title))
        .wrap(Wrap { trim: false });
    frame.render_widget(form, area);
}
