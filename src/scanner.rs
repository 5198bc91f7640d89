use memchr::{memchr, memchr2, memchr3};

use crate::value::{Diagnostic, Value};

const DELIMITER: u8 = b',';
const QUOTE: u8 = b'"';
const CR: u8 = b'\r';
const LF: u8 = b'\n';

/// Scans the single field starting at `buf[0]`.
///
/// `buf` runs from the first byte of the field to the end of input. The
/// returned value reports how many bytes the field took, so the next field
/// starts at `buf[value.consumed()..]`. An empty `buf` yields an `Empty`
/// value that consumed nothing.
pub fn scan_value(buf: &[u8]) -> Value<'_> {
    match buf {
        [] => Value::exhausted(),
        [CR, LF, ..] => Value::row_break(),
        [DELIMITER, ..] => Value::empty_field(),
        [QUOTE, ..] => scan_quoted(buf),
        _ => scan_unquoted(buf),
    }
}

fn scan_unquoted(buf: &[u8]) -> Value<'_> {
    let mut diagnostic = None;
    let mut pos = 0;

    loop {
        let Some(offset) = memchr3(DELIMITER, QUOTE, CR, &buf[pos..]) else {
            return Value::field(buf, 0..buf.len(), buf.len(), false, false, diagnostic);
        };
        let at = pos + offset;

        match buf[at] {
            DELIMITER => return Value::field(buf, 0..at, at + 1, false, false, diagnostic),
            QUOTE => {
                diagnostic.get_or_insert(Diagnostic::StrayQuote);
            }
            _ => {
                if buf.get(at + 1) == Some(&LF) {
                    return Value::field(buf, 0..at, at, false, false, diagnostic);
                }
            }
        }
        pos = at + 1;
    }
}

fn scan_quoted(buf: &[u8]) -> Value<'_> {
    let mut escaped = false;
    let mut pos = 1;

    let close = loop {
        let Some(offset) = memchr(QUOTE, &buf[pos..]) else {
            return Value::field(
                buf,
                1..buf.len(),
                buf.len(),
                true,
                escaped,
                Some(Diagnostic::UnterminatedQuote),
            );
        };
        let at = pos + offset;

        if buf.get(at + 1) == Some(&QUOTE) {
            escaped = true;
            pos = at + 2;
        } else {
            break at;
        }
    };

    let content = 1..close;
    let (consumed, diagnostic) = scan_after_quote(buf, close + 1);
    Value::field(buf, content, consumed, true, escaped, diagnostic)
}

/// Finds where a quoted field ends once its closing quote at `start - 1`
/// is known.
fn scan_after_quote(buf: &[u8], start: usize) -> (usize, Option<Diagnostic>) {
    match &buf[start..] {
        [] => return (start, None),
        [DELIMITER, ..] => return (start + 1, None),
        [CR, LF, ..] => return (start, None),
        _ => {}
    }

    let mut pos = start;
    loop {
        let Some(offset) = memchr2(DELIMITER, CR, &buf[pos..]) else {
            return (buf.len(), Some(Diagnostic::TrailingAfterQuote));
        };
        let at = pos + offset;

        if buf[at] == DELIMITER {
            return (at + 1, Some(Diagnostic::TrailingAfterQuote));
        }
        if buf.get(at + 1) == Some(&LF) {
            return (at, Some(Diagnostic::TrailingAfterQuote));
        }
        pos = at + 1;
    }
}
