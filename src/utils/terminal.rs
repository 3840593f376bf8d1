//! Terminal output sanitization
//!
//! Equipment names and types come straight from user-supplied CSV files and are drawn in the
//! dashboard and printed by the CLI. Escape sequences in them could clear the screen, move the
//! cursor or restyle the terminal, so every CSV-derived string goes through [`sanitize_cell`]
//! before display.

use std::borrow::Cow;

/// Strips ANSI CSI sequences and all control characters, yielding a single display line
///
/// Borrows when the input is already clean.
///
/// # Examples
///
/// ```
/// use chemvis::utils::terminal::sanitize_cell;
///
/// assert_eq!(sanitize_cell("\x1b[31mPump-1\x1b[0m"), "Pump-1");
/// assert_eq!(sanitize_cell("Valve\tA"), "ValveA");
/// ```
pub fn sanitize_cell(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // CSI runs until its final letter
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }

        if !ch.is_control() {
            result.push(ch);
        }
    }

    Cow::Owned(result)
}

/// Clips to `max_chars` characters, marking the cut with an ellipsis
pub fn truncate_display(text: &str, max_chars: usize) -> Cow<'_, str> {
    if text.chars().count() <= max_chars {
        return Cow::Borrowed(text);
    }
    if max_chars == 0 {
        return Cow::Borrowed("");
    }

    let kept: String = text.chars().take(max_chars - 1).collect();
    Cow::Owned(format!("{}…", kept))
}
