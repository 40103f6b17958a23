use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::config;
use crate::editor::Field;
use crate::library::KeyValueStorage;
use crate::playback::MediaHandle;
use crate::ui::{self, Hitboxes};

/// What the loop should do after an input event.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Main terminal event loop: drains media events, draws, and dispatches
/// input. Returns `Ok(())` when the user quits.
pub fn run<S: KeyValueStorage, M: MediaHandle>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<S, M>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut hitboxes = Hitboxes::default();
    loop {
        app.tick();

        terminal.draw(|f| hitboxes = ui::draw(f, app, settings))?;

        if event::poll(Duration::from_millis(50))? {
            let flow = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(key, app),
                Event::Mouse(mouse) => {
                    handle_mouse_event(mouse, &hitboxes, app);
                    Flow::Continue
                }
                _ => Flow::Continue,
            };
            if flow == Flow::Quit {
                break;
            }
        }
    }

    Ok(())
}

/// Left click on the progress bar seeks proportionally.
pub fn handle_mouse_event<S: KeyValueStorage, M: MediaHandle>(
    mouse: MouseEvent,
    hitboxes: &Hitboxes,
    app: &mut App<S, M>,
) {
    if app.library_open || mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    if let Some((offset, width)) = hitboxes.progress_click(mouse.column, mouse.row) {
        app.seek_click(offset, width);
    }
}

pub fn handle_key_event<S: KeyValueStorage, M: MediaHandle>(
    key: KeyEvent,
    app: &mut App<S, M>,
) -> Flow {
    if app.editor.is_open() {
        handle_form_key(key, app);
        return Flow::Continue;
    }
    if app.library_open {
        handle_library_key(key, app);
        return Flow::Continue;
    }

    match key.code {
        KeyCode::Char('q') => return Flow::Quit,
        KeyCode::Char('p') | KeyCode::Char(' ') => app.toggle_play(),
        KeyCode::Char('l') | KeyCode::Right => app.next_track(),
        KeyCode::Char('h') | KeyCode::Left => app.prev_track(),
        KeyCode::Char('L') => app.scrub_forward(),
        KeyCode::Char('H') => app.scrub_backward(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.volume_up(),
        KeyCode::Char('-') => app.volume_down(),
        KeyCode::Char('m') => app.toggle_mute(),
        KeyCode::Char('s') => app.toggle_shuffle(),
        KeyCode::Char('r') => app.cycle_repeat(),
        KeyCode::Char('v') => app.toggle_lyrics(),
        KeyCode::Char('f') => app.toggle_like(),
        KeyCode::Char('b') => app.open_library(),
        KeyCode::Esc => app.clear_status(),
        _ => {}
    }
    Flow::Continue
}

fn handle_library_key<S: KeyValueStorage, M: MediaHandle>(key: KeyEvent, app: &mut App<S, M>) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('q') => app.close_library(),
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Enter => app.choose_selected(),
        KeyCode::Char('a') => app.open_add(),
        KeyCode::Char('e') => app.edit_selected(),
        KeyCode::Char('d') => app.delete_selected(),
        KeyCode::Char(' ') => app.toggle_play(),
        _ => {}
    }
}

fn handle_form_key<S: KeyValueStorage, M: MediaHandle>(key: KeyEvent, app: &mut App<S, M>) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('s') {
            app.commit_draft();
        }
        return;
    }

    let on_audio_field = app
        .editor
        .draft()
        .is_some_and(|d| d.focus() == Field::AudioPath);
    match key.code {
        KeyCode::Esc => return app.cancel_draft(),
        KeyCode::Enter if on_audio_field => return app.attach_typed_audio(),
        _ => {}
    }

    let Some(draft) = app.editor.draft_mut() else {
        return;
    };
    match key.code {
        KeyCode::Tab | KeyCode::Down => draft.focus_next(),
        KeyCode::BackTab | KeyCode::Up => draft.focus_prev(),
        KeyCode::Backspace => draft.backspace(),
        KeyCode::Enter if draft.focus().is_multiline() => draft.insert_newline(),
        KeyCode::Enter => draft.focus_next(),
        KeyCode::Char(c) => draft.insert_char(c),
        _ => {}
    }
}
