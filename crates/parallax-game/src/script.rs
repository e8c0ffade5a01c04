//! Scripted key presses for headless sessions.

use std::collections::BTreeSet;

use parallax_config::InputConfig;
use parallax_input::{InputError, KeyboardState, parse_key_code};
use winit::keyboard::KeyCode;

/// Which keys to press on which frames.
#[derive(Debug, Clone)]
pub struct SessionScript {
    switch_key: KeyCode,
    jump_key: Option<KeyCode>,
    right_key: Option<KeyCode>,
    switch_at: BTreeSet<u64>,
    jump_at: BTreeSet<u64>,
    walk: bool,
}

impl SessionScript {
    /// Uses the first configured key of each binding.
    pub fn new(
        input: &InputConfig,
        switch_at: &[u64],
        jump_at: &[u64],
        walk: bool,
    ) -> Result<Self, InputError> {
        let first = |names: &[String]| names.first().map(|n| parse_key_code(n)).transpose();
        Ok(Self {
            switch_key: parse_key_code(&input.switch_key)?,
            jump_key: first(&input.jump)?,
            right_key: first(&input.move_right)?,
            switch_at: switch_at.iter().copied().collect(),
            jump_at: jump_at.iter().copied().collect(),
            walk,
        })
    }

    /// Presses and releases keys for `frame`. Taps last exactly one frame.
    pub fn drive(&self, frame: u64, keyboard: &mut KeyboardState) {
        let tap = |keyboard: &mut KeyboardState, key: KeyCode, scheduled: &BTreeSet<u64>| {
            if scheduled.contains(&frame) {
                keyboard.press(key);
            } else {
                keyboard.release(key);
            }
        };

        tap(keyboard, self.switch_key, &self.switch_at);
        if let Some(key) = self.jump_key {
            tap(keyboard, key, &self.jump_at);
        }
        if let Some(key) = self.right_key {
            if self.walk {
                keyboard.press(key);
            } else {
                keyboard.release(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::PhysicalKey;

    #[test]
    fn test_switch_taps_on_scheduled_frames() {
        let script = SessionScript::new(&InputConfig::default(), &[2], &[], false).unwrap();
        let mut keyboard = KeyboardState::new();
        let x = PhysicalKey::Code(KeyCode::KeyX);

        for frame in 0..4 {
            keyboard.clear_transients();
            script.drive(frame, &mut keyboard);
            assert_eq!(keyboard.just_pressed(x), frame == 2, "frame {frame}");
        }
        assert!(!keyboard.is_pressed(x));
    }

    #[test]
    fn test_walk_holds_right() {
        let script = SessionScript::new(&InputConfig::default(), &[], &[], true).unwrap();
        let mut keyboard = KeyboardState::new();
        script.drive(0, &mut keyboard);
        script.drive(1, &mut keyboard);
        assert!(keyboard.is_pressed(PhysicalKey::Code(KeyCode::KeyD)));
    }

    #[test]
    fn test_unknown_switch_key() {
        let input = InputConfig {
            switch_key: "Nope".to_string(),
            ..InputConfig::default()
        };
        assert!(SessionScript::new(&input, &[], &[], false).is_err());
    }
}
