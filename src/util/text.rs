use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

fn is_stripped_control(c: char) -> bool {
    c.is_control() && c != '\t' && c != '\n'
}

/// Removes terminal control characters and ANSI escape sequences.
///
/// Headlines come from third-party publishers and end up drawn straight to
/// the terminal, so CSI (`ESC [ ... final`) and OSC (`ESC ] ... BEL|ST`)
/// sequences are dropped whole and any other control character except tab
/// and newline is removed.
///
/// Returns `Cow::Borrowed` when nothing needed stripping.
///
/// # Examples
///
/// ```
/// use headlines::util::strip_control_chars;
///
/// assert_eq!(strip_control_chars("plain"), "plain");
/// assert_eq!(strip_control_chars("red\x1b[31mtext"), "redtext");
/// assert_eq!(strip_control_chars("bell\x07"), "bell");
/// ```
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_stripped_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\x1b' {
            if !is_stripped_control(c) {
                out.push(c);
            }
            continue;
        }

        match chars.peek() {
            Some('[') => {
                chars.next();
                // Parameters and intermediates run until a final byte in @..~
                for c in chars.by_ref() {
                    if ('\x40'..='\x7e').contains(&c) {
                        break;
                    }
                }
            }
            Some(']') => {
                chars.next();
                while let Some(c) = chars.next() {
                    if c == '\x07' {
                        break;
                    }
                    if c == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    Cow::Owned(out)
}

/// Collapses all whitespace runs (including newlines) to single spaces.
///
/// Descriptions are drawn as one wrapped paragraph; embedded line breaks
/// from the API would otherwise leave ragged blocks.
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

const ELLIPSIS: &str = "...";

/// Truncates `s` to at most `max_width` terminal columns.
///
/// Wide characters count as two columns. When text is cut an ellipsis is
/// appended if there is room for it.
///
/// ```
/// use headlines::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Short", 10), "Short");
/// assert_eq!(truncate_to_width("Breaking news today", 10), "Breakin...");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if s.width() <= max_width {
        return Cow::Borrowed(s);
    }

    let ellipsis = if max_width > ELLIPSIS.len() { ELLIPSIS } else { "" };
    let budget = max_width - ellipsis.len();

    let mut out = String::with_capacity(max_width);
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(ellipsis);
    Cow::Owned(out)
}
