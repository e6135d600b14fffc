use crossterm::event::Event as CrossTermEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;

use crate::events::Event;

/// Converts a crossterm event into a runner event
pub fn convert_event(event: CrossTermEvent) -> Option<Event> {
    let CrossTermEvent::Key(key_event) = event else {
        return None;
    };

    // Some platforms report releases too
    if key_event.kind == KeyEventKind::Release {
        return None;
    }

    match key_event {
        KeyEvent {
            code: KeyCode::Char('q'),
            ..
        }
        | KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        } => Some(Event::Exit),
        KeyEvent {
            code: KeyCode::Char(' '),
            ..
        } => Some(Event::TogglePause),
        KeyEvent {
            code: KeyCode::Char('n'),
            ..
        } => Some(Event::Step),
        KeyEvent {
            code: KeyCode::Char('d'),
            ..
        } => Some(Event::DumpRows),
        _ => None,
    }
}
