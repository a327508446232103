//! Keyboard to pad mapping.
//!
//! | Button | Pad 1 | Pad 2 |
//! |--------|-------|-------|
//! | Up/Left/Down/Right | W/A/S/D | arrow keys |
//! | Start | Enter | P |
//! | A/B/C | J/K/L | 1/2/3 |
//! | X/Y/Z | U/I/O | 4/5/6 |
//! | L/R | Q/E | 7/8 |
//!
//! Networked games only read pad 1.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use lockstep_app::PadState;
use lockstep_proto::Buttons;

/// Ticks a key stays held after its last press or repeat when the terminal
/// does not report releases.
pub const AUTO_RELEASE_TICKS: u64 = 8;

/// Which local pad a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pad {
    /// First pad
    One,
    /// Second pad
    Two,
}

/// Pad and button bound to `code`, if any.
pub fn lookup(code: KeyCode) -> Option<(Pad, Buttons)> {
    let binding = match code {
        KeyCode::Up => (Pad::Two, Buttons::UP),
        KeyCode::Left => (Pad::Two, Buttons::LEFT),
        KeyCode::Down => (Pad::Two, Buttons::DOWN),
        KeyCode::Right => (Pad::Two, Buttons::RIGHT),
        KeyCode::Enter => (Pad::One, Buttons::START),
        KeyCode::Char(c) => return lookup_char(c.to_ascii_lowercase()),
        _ => return None,
    };
    Some(binding)
}

fn lookup_char(c: char) -> Option<(Pad, Buttons)> {
    let binding = match c {
        'w' => (Pad::One, Buttons::UP),
        'a' => (Pad::One, Buttons::LEFT),
        's' => (Pad::One, Buttons::DOWN),
        'd' => (Pad::One, Buttons::RIGHT),
        'j' => (Pad::One, Buttons::A),
        'k' => (Pad::One, Buttons::B),
        'l' => (Pad::One, Buttons::C),
        'u' => (Pad::One, Buttons::X),
        'i' => (Pad::One, Buttons::Y),
        'o' => (Pad::One, Buttons::Z),
        'q' => (Pad::One, Buttons::L),
        'e' => (Pad::One, Buttons::R),
        'p' => (Pad::Two, Buttons::START),
        '1' => (Pad::Two, Buttons::A),
        '2' => (Pad::Two, Buttons::B),
        '3' => (Pad::Two, Buttons::C),
        '4' => (Pad::Two, Buttons::X),
        '5' => (Pad::Two, Buttons::Y),
        '6' => (Pad::Two, Buttons::Z),
        '7' => (Pad::Two, Buttons::L),
        '8' => (Pad::Two, Buttons::R),
        _ => return None,
    };
    Some(binding)
}

/// Turns key events into held pad buttons.
///
/// Terminals with keyboard enhancement report releases and keys stay held
/// until released. Otherwise a key counts as held for
/// [`AUTO_RELEASE_TICKS`] after its last press or repeat.
#[derive(Debug, Default)]
pub struct HeldKeys {
    held: HashMap<(Pad, Buttons), u64>,
    releases_reported: bool,
}

impl HeldKeys {
    /// Tracker for a terminal that does or does not report releases.
    pub fn new(releases_reported: bool) -> Self {
        Self { held: HashMap::new(), releases_reported }
    }

    /// Record one key event at `tick`. Unbound keys are ignored.
    pub fn handle(&mut self, event: &KeyEvent, tick: u64) {
        let Some(binding) = lookup(event.code) else {
            return;
        };
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.held.insert(binding, tick);
            },
            KeyEventKind::Release => {
                self.held.remove(&binding);
            },
        }
    }

    /// Buttons held on both pads at `tick`.
    pub fn pads(&mut self, tick: u64) -> PadState {
        if !self.releases_reported {
            self.held.retain(|_, pressed| tick.saturating_sub(*pressed) < AUTO_RELEASE_TICKS);
        }

        let mut pads = PadState::default();
        for &(pad, button) in self.held.keys() {
            match pad {
                Pad::One => pads.pad1 |= button,
                Pad::Two => pads.pad2 |= button,
            }
        }
        pads
    }
}
