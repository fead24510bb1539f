//! Text notation for key presses.
//!
//! A chord is `Mod+Mod+Key`, for example `Alt+j`, `Ctrl+Shift+o`, `Esc` or
//! `Meta+s`. A script is whitespace-separated chords where a double-quoted
//! token types each char literally and `#` starts a comment line.

use super::{KeyCode, KeyEvent, Modifiers};
use crate::error::OutlineError;

fn named_key(name: &str) -> Option<KeyCode> {
    let code = match name.to_ascii_lowercase().as_str() {
        "esc" | "escape" => KeyCode::Escape,
        "enter" | "return" => KeyCode::Enter,
        "backspace" | "bs" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "tab" => KeyCode::Tab,
        "space" => KeyCode::Space,
        "left" | "arrowleft" => KeyCode::Left,
        "right" | "arrowright" => KeyCode::Right,
        "up" | "arrowup" => KeyCode::Up,
        "down" | "arrowdown" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        _ => return None,
    };
    Some(code)
}

fn browser_code(name: &str) -> Option<KeyEvent> {
    let single = |rest: &str| {
        let mut chars = rest.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(ch),
            _ => None,
        }
    };
    if let Some(letter) = name.strip_prefix("Key").and_then(single) {
        if letter.is_ascii_alphabetic() {
            return Some(KeyEvent::new(
                KeyCode::Letter(letter.to_ascii_lowercase()),
                Modifiers::NONE,
            ));
        }
    }
    if let Some(digit) = name.strip_prefix("Digit").and_then(single) {
        return digit.is_ascii_digit().then(|| KeyEvent::typed(digit));
    }
    None
}

fn parse_chord_at(token: &str, line: usize) -> Result<KeyEvent, OutlineError> {
    if token.is_empty() {
        return Err(OutlineError::parse(line, "empty chord"));
    }
    if token == "+" {
        return Ok(KeyEvent::typed('+'));
    }
    let mut modifiers = Modifiers::NONE;
    let mut parts: Vec<&str> = token.split('+').collect();
    // "Ctrl++" names the plus key itself.
    if token.ends_with("++") {
        parts.truncate(parts.len() - 2);
        parts.push("+");
    }
    let Some((key, held)) = parts.split_last() else {
        return Err(OutlineError::parse(line, format!("empty chord '{token}'")));
    };
    for modifier in held {
        match modifier.to_ascii_lowercase().as_str() {
            "meta" | "cmd" | "super" => modifiers.meta = true,
            "ctrl" | "control" => modifiers.ctrl = true,
            "alt" | "option" => modifiers.alt = true,
            "shift" => modifiers.shift = true,
            other => {
                return Err(OutlineError::parse(
                    line,
                    format!("unknown modifier '{other}' in '{token}'"),
                ))
            }
        }
    }

    let mut event = if let Some(code) = named_key(key) {
        KeyEvent::new(code, Modifiers::NONE)
    } else if let Some(event) = browser_code(key) {
        event
    } else {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => KeyEvent::typed(ch),
            _ => {
                return Err(OutlineError::parse(
                    line,
                    format!("unknown key '{key}' in '{token}'"),
                ))
            }
        }
    };

    event.modifiers = Modifiers {
        meta: modifiers.meta,
        ctrl: modifiers.ctrl,
        alt: modifiers.alt,
        shift: modifiers.shift || event.modifiers.shift,
    };
    if let (KeyCode::Letter(ch), Some(_)) = (event.code, event.text) {
        event.text = Some(if event.modifiers.shift {
            ch.to_ascii_uppercase()
        } else {
            ch
        });
    }
    Ok(event)
}

/// Parse a single chord such as `Alt+j` or `Esc`.
pub fn parse_chord(token: &str) -> Result<KeyEvent, OutlineError> {
    parse_chord_at(token.trim(), 1)
}

fn push_quoted(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    line: usize,
    out: &mut Vec<KeyEvent>,
) -> Result<(), OutlineError> {
    loop {
        match chars.next() {
            Some('"') => return Ok(()),
            Some('\\') => match chars.next() {
                Some(escaped) => out.push(KeyEvent::typed(escaped)),
                None => return Err(OutlineError::parse(line, "dangling escape")),
            },
            Some(ch) => out.push(KeyEvent::typed(ch)),
            None => return Err(OutlineError::parse(line, "unterminated quote")),
        }
    }
}

/// Parse a key script into events, in order.
///
/// # Errors
/// Returns [`OutlineError::Parse`] with the 1-based line of the first bad
/// token.
pub fn parse_script(script: &str) -> Result<Vec<KeyEvent>, OutlineError> {
    let mut events = Vec::new();
    for (index, raw) in script.lines().enumerate() {
        let line = index + 1;
        if raw.trim_start().starts_with('#') {
            continue;
        }
        let mut chars = raw.chars().peekable();
        let mut token = String::new();
        while let Some(ch) = chars.next() {
            match ch {
                '"' if token.is_empty() => push_quoted(&mut chars, line, &mut events)?,
                ch if ch.is_whitespace() => {
                    if !token.is_empty() {
                        events.push(parse_chord_at(&token, line)?);
                        token.clear();
                    }
                }
                ch => token.push(ch),
            }
        }
        if !token.is_empty() {
            events.push(parse_chord_at(&token, line)?);
        }
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chords_with_modifiers() {
        let event = parse_chord("Alt+j").expect("chord");
        assert_eq!(event.code, KeyCode::Letter('j'));
        assert_eq!(event.modifiers, Modifiers::ALT);

        let event = parse_chord("ctrl+shift+o").expect("chord");
        assert_eq!(event.code, KeyCode::Letter('o'));
        assert!(event.modifiers.ctrl && event.modifiers.shift);
        assert_eq!(event.text, Some('O'));
    }

    #[test]
    fn named_and_browser_codes() {
        assert_eq!(parse_chord("Esc").expect("esc").code, KeyCode::Escape);
        assert_eq!(parse_chord("Return").expect("enter").code, KeyCode::Enter);
        assert_eq!(
            parse_chord("Meta+KeyS").expect("save"),
            KeyEvent::new(KeyCode::Letter('s'), Modifiers::META)
        );
        assert_eq!(parse_chord("Digit4").expect("digit").code, KeyCode::Digit(4));
        assert_eq!(parse_chord("$").expect("dollar").code, KeyCode::Symbol('$'));
        assert_eq!(parse_chord("Ctrl++").expect("plus").code, KeyCode::Symbol('+'));
    }

    #[test]
    fn uppercase_letter_implies_shift() {
        let event = parse_chord("O").expect("chord");
        assert_eq!(event.code, KeyCode::Letter('o'));
        assert_eq!(event.modifiers, Modifiers::SHIFT);
    }

    #[test]
    fn bad_chords_report_line() {
        assert!(matches!(
            parse_chord("Hyper+j"),
            Err(OutlineError::Parse { line: 1, .. })
        ));
        match parse_script("j k\nAlt+nope") {
            Err(OutlineError::Parse { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("nope"), "{message}");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn scripts_expand_quoted_text() {
        let events = parse_script("# add one\no \"Hi there\" Esc").expect("script");
        assert_eq!(events.len(), 10);
        assert_eq!(events[0].code, KeyCode::Letter('o'));
        assert_eq!(events[1], KeyEvent::typed('H'));
        assert_eq!(events[3].code, KeyCode::Space);
        assert_eq!(events[9].code, KeyCode::Escape);
    }

    #[test]
    fn quoted_escapes_and_errors() {
        let events = parse_script(r#""a\"b""#).expect("script");
        let typed: String = events.iter().filter_map(|event| event.text).collect();
        assert_eq!(typed, "a\"b");
        assert!(parse_script("\"open").is_err());
    }
}
