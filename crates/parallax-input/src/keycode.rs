//! Key names as written in `config.ron`, resolved to winit [`KeyCode`]s.

use winit::keyboard::KeyCode;

/// Errors raised while building input mappings.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    /// A binding names a key this crate does not know.
    #[error("unknown key: {0}")]
    UnknownKey(String),
}

/// Parses a key from its `KeyCode` debug name (e.g., `"KeyX"`, `"Space"`).
pub fn parse_key_code(name: &str) -> Result<KeyCode, InputError> {
    Ok(match name {
        "KeyA" => KeyCode::KeyA,
        "KeyB" => KeyCode::KeyB,
        "KeyC" => KeyCode::KeyC,
        "KeyD" => KeyCode::KeyD,
        "KeyE" => KeyCode::KeyE,
        "KeyF" => KeyCode::KeyF,
        "KeyG" => KeyCode::KeyG,
        "KeyH" => KeyCode::KeyH,
        "KeyI" => KeyCode::KeyI,
        "KeyJ" => KeyCode::KeyJ,
        "KeyK" => KeyCode::KeyK,
        "KeyL" => KeyCode::KeyL,
        "KeyM" => KeyCode::KeyM,
        "KeyN" => KeyCode::KeyN,
        "KeyO" => KeyCode::KeyO,
        "KeyP" => KeyCode::KeyP,
        "KeyQ" => KeyCode::KeyQ,
        "KeyR" => KeyCode::KeyR,
        "KeyS" => KeyCode::KeyS,
        "KeyT" => KeyCode::KeyT,
        "KeyU" => KeyCode::KeyU,
        "KeyV" => KeyCode::KeyV,
        "KeyW" => KeyCode::KeyW,
        "KeyX" => KeyCode::KeyX,
        "KeyY" => KeyCode::KeyY,
        "KeyZ" => KeyCode::KeyZ,
        "Digit0" => KeyCode::Digit0,
        "Digit1" => KeyCode::Digit1,
        "Digit2" => KeyCode::Digit2,
        "Digit3" => KeyCode::Digit3,
        "Digit4" => KeyCode::Digit4,
        "Digit5" => KeyCode::Digit5,
        "Digit6" => KeyCode::Digit6,
        "Digit7" => KeyCode::Digit7,
        "Digit8" => KeyCode::Digit8,
        "Digit9" => KeyCode::Digit9,
        "Space" => KeyCode::Space,
        "Enter" => KeyCode::Enter,
        "Escape" => KeyCode::Escape,
        "Tab" => KeyCode::Tab,
        "ShiftLeft" => KeyCode::ShiftLeft,
        "ShiftRight" => KeyCode::ShiftRight,
        "ControlLeft" => KeyCode::ControlLeft,
        "ControlRight" => KeyCode::ControlRight,
        "AltLeft" => KeyCode::AltLeft,
        "AltRight" => KeyCode::AltRight,
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        _ => return Err(InputError::UnknownKey(name.to_string())),
    })
}

/// Parses every name in `names`, failing on the first unknown one.
pub fn parse_key_codes(names: &[String]) -> Result<Vec<KeyCode>, InputError> {
    names.iter().map(|name| parse_key_code(name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_match_debug_output() {
        for code in [KeyCode::KeyX, KeyCode::Space, KeyCode::ArrowLeft] {
            assert_eq!(parse_key_code(&format!("{code:?}")), Ok(code));
        }
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(
            parse_key_code("Banana"),
            Err(InputError::UnknownKey("Banana".to_string()))
        );
    }

    #[test]
    fn test_parse_list_stops_on_unknown() {
        let names = vec!["KeyA".to_string(), "Nope".to_string()];
        assert!(parse_key_codes(&names).is_err());
    }
}
