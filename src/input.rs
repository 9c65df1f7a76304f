use crate::config;
use crate::event::Event;
use clap::ValueEnum;
use color_eyre::eyre::Result;
use crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Produces the key events for one tick
pub trait InputSource {
    /// `text_entry` tells the source whether printable keys should be typed
    /// rather than treated as shortcuts.
    fn poll_events(&mut self, text_entry: bool) -> Result<Vec<Event>>;
}

/// How physical keys map onto session events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Keymap {
    /// Arrows, Enter, Backspace, Esc, F5; letter shortcuts outside text entry
    #[default]
    Desktop,
    /// The handheld's keyboard: r rescans and q goes back everywhere
    Cardputer,
}

impl Keymap {
    /// Translate a key press. Releases and repeats must be filtered by the
    /// caller.
    pub fn translate(self, key: &KeyEvent, text_entry: bool) -> Option<Event> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') if ctrl => return Some(Event::Quit),
            KeyCode::Char('r') if ctrl => return Some(Event::Rescan),
            KeyCode::F(5) => return Some(Event::Rescan),
            KeyCode::Up => return Some(Event::Up),
            KeyCode::Down => return Some(Event::Down),
            KeyCode::Enter => return Some(Event::Confirm),
            KeyCode::Backspace | KeyCode::Delete => return Some(Event::Delete),
            KeyCode::Esc => return Some(Event::Back),
            _ => {}
        }

        let KeyCode::Char(c) = key.code else {
            return None;
        };
        if ctrl || key.modifiers.contains(KeyModifiers::ALT) {
            return None;
        }

        match self {
            Keymap::Desktop if text_entry => Some(Event::Char(c)),
            Keymap::Desktop => match c {
                'r' | 'R' => Some(Event::Rescan),
                'q' | 'Q' => Some(Event::Back),
                'k' | 'w' | 'W' => Some(Event::Up),
                'j' | 's' | 'S' => Some(Event::Down),
                _ => Some(Event::Char(c)),
            },
            Keymap::Cardputer => match c {
                'r' | 'R' => Some(Event::Rescan),
                'q' | 'Q' => Some(Event::Back),
                'w' | 'W' if !text_entry => Some(Event::Up),
                's' | 'S' if !text_entry => Some(Event::Down),
                _ => Some(Event::Char(c)),
            },
        }
    }
}

/// Terminal keyboard, edge-triggered: only press events become session events
#[derive(Debug)]
pub struct TerminalInput {
    keymap: Keymap,
    poll_timeout: Duration,
}

impl TerminalInput {
    pub fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            poll_timeout: Duration::from_millis(config::EVENT_POLL_MS),
        }
    }
}

impl InputSource for TerminalInput {
    fn poll_events(&mut self, text_entry: bool) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        let mut timeout = self.poll_timeout;

        // Wait up to one tick for the first key, then drain whatever is queued
        while event::poll(timeout)? {
            timeout = Duration::ZERO;
            if let event::Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
                && let Some(ev) = self.keymap.translate(&key, text_entry)
            {
                events.push(ev);
            }
        }
        Ok(events)
    }
}
