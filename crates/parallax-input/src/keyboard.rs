//! Held keys and this frame's key edges.
//!
//! The world switch fires on the frame its key goes down, never while it is
//! held, so edges are tracked separately from the held set and dropped by
//! [`KeyboardState::clear_transients`] once the frame is over.

use std::collections::HashSet;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// A key event stripped down to what the tracker reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKeyEvent {
    pub key: PhysicalKey,
    pub state: ElementState,
    /// OS auto-repeat. Ignored.
    pub repeat: bool,
}

/// Keyboard state keyed by physical key position.
///
/// Feed it events as they arrive, read it during the frame, then call
/// [`clear_transients`](Self::clear_transients).
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<PhysicalKey>,
    went_down: HashSet<PhysicalKey>,
    went_up: HashSet<PhysicalKey>,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a winit [`KeyEvent`].
    pub fn process_event(&mut self, event: &KeyEvent) {
        self.process_raw(RawKeyEvent {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        });
    }

    /// Feeds a [`RawKeyEvent`].
    ///
    /// Only real transitions produce edges: a press for a key already held
    /// (a release went missing) and a release for a key not held are ignored.
    pub fn process_raw(&mut self, event: RawKeyEvent) {
        if event.repeat {
            return;
        }
        let key = event.key;
        let changed = match event.state {
            ElementState::Pressed => self.held.insert(key),
            ElementState::Released => self.held.remove(&key),
        };
        if !changed {
            return;
        }
        match event.state {
            ElementState::Pressed => self.went_down.insert(key),
            ElementState::Released => self.went_up.insert(key),
        };
    }

    /// Presses `code`, as a scripted source would.
    pub fn press(&mut self, code: KeyCode) {
        self.set(code, ElementState::Pressed);
    }

    /// Releases `code`.
    pub fn release(&mut self, code: KeyCode) {
        self.set(code, ElementState::Released);
    }

    fn set(&mut self, code: KeyCode, state: ElementState) {
        self.process_raw(RawKeyEvent {
            key: PhysicalKey::Code(code),
            state,
            repeat: false,
        });
    }

    #[must_use]
    pub fn is_pressed(&self, key: PhysicalKey) -> bool {
        self.held.contains(&key)
    }

    /// The key went down during the current frame.
    #[must_use]
    pub fn just_pressed(&self, key: PhysicalKey) -> bool {
        self.went_down.contains(&key)
    }

    /// The key came up during the current frame.
    #[must_use]
    pub fn just_released(&self, key: PhysicalKey) -> bool {
        self.went_up.contains(&key)
    }

    /// Whether any of `codes` is held.
    #[must_use]
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes
            .iter()
            .any(|&code| self.held.contains(&PhysicalKey::Code(code)))
    }

    /// Ends the frame: forgets edges, keeps held keys.
    pub fn clear_transients(&mut self) {
        self.went_down.clear();
        self.went_up.clear();
    }
}
