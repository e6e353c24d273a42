use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";

/// Display width of `s` in terminal columns (CJK and emoji count as 2).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut `s` down to at most `max_width` columns, ending in "..." when cut.
///
/// Widths of 3 or less have no room for the ellipsis and just keep whatever
/// characters fit.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let (budget, suffix) = if max_width <= ELLIPSIS.len() {
        (max_width, "")
    } else {
        (max_width - ELLIPSIS.len(), ELLIPSIS)
    };

    let mut used = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }

    Cow::Owned(format!("{}{}", &s[..end], suffix))
}

/// Remove terminal control characters and ANSI escape sequences.
///
/// Headlines come from third parties and are drawn straight into the
/// terminal. Tab, newline and carriage return are kept; CSI (`ESC [` or the
/// single-character C1 form `U+009B`) and OSC (`ESC ]`, ended by BEL or
/// `ESC \`) sequences are dropped whole, as are other C1 controls.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    fn is_control(c: char) -> bool {
        (c.is_ascii_control() && !matches!(c, '\t' | '\n' | '\r'))
            || c == '\u{7f}'
            || ('\u{80}'..='\u{9f}').contains(&c)
    }

    // Parameter bytes up to and including the final byte
    fn skip_csi(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
        for c in chars.by_ref() {
            if ('\u{40}'..='\u{7e}').contains(&c) {
                break;
            }
        }
    }

    if !s.chars().any(is_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\u{9b}' {
            skip_csi(&mut chars);
            continue;
        }
        if c != '\u{1b}' {
            if !is_control(c) {
                out.push(c);
            }
            continue;
        }
        match chars.peek() {
            Some('[') => {
                chars.next();
                skip_csi(&mut chars);
            }
            Some(']') => {
                chars.next();
                while let Some(c) = chars.next() {
                    if c == '\u{07}' {
                        break;
                    }
                    if c == '\u{1b}' && chars.peek() == Some(&'\\') {
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

/// Drop the `[+1234 chars]` tail NewsAPI appends to truncated content.
pub fn trim_truncation_marker(content: &str) -> &str {
    let trimmed = content.trim_end();
    let Some(open) = trimmed.rfind("[+") else {
        return trimmed;
    };
    let tail = &trimmed[open + 2..];
    let is_marker = tail
        .strip_suffix(" chars]")
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()));

    if is_marker {
        trimmed[..open].trim_end()
    } else {
        trimmed
    }
}
