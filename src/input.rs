//! Input signals and the sources that produce them.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    Quit,
    PauseToggle,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
}

pub trait InputSource {
    /// Wait at most `timeout` for one signal.  `Ok(None)` means nothing
    /// arrived, or what arrived does not map to a signal.
    fn poll_input(&mut self, timeout: Duration) -> Result<Option<Signal>>;
}

/// Map a key event to a signal.  Only presses count; repeats and releases
/// from keyboard-enhanced terminals are ignored.
pub fn signal_for_key(key: &KeyEvent) -> Option<Signal> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Signal::Quit),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Signal::Quit),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Signal::PauseToggle),
        KeyCode::Left => Some(Signal::MoveLeft),
        KeyCode::Right => Some(Signal::MoveRight),
        KeyCode::Up => Some(Signal::MoveUp),
        KeyCode::Down => Some(Signal::MoveDown),
        _ => None,
    }
}

/// Reads the keyboard through crossterm.  Returns as soon as an event
/// arrives, so a held key speeds the loop up just like a curses half-delay.
#[derive(Debug, Default)]
pub struct TerminalInput;

impl InputSource for TerminalInput {
    fn poll_input(&mut self, timeout: Duration) -> Result<Option<Signal>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) => Ok(signal_for_key(&key)),
            _ => Ok(None),
        }
    }
}
