use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

use memchr::memchr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Empty,
    RowBreak,
    Text,
}

/// Lexical irregularities noticed while scanning a field.
///
/// These never stop a scan. Whether they are fatal is up to the caller
/// (see [`ScanMode`](crate::ScanMode)).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic {
    /// Opening quote with no closing quote before end of buffer.
    UnterminatedQuote,
    /// `"` in the middle of an unquoted field, kept as content.
    StrayQuote,
    /// Bytes between a closing quote and the delimiter, dropped from content.
    TrailingAfterQuote,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Diagnostic::UnterminatedQuote => "quoted field is not closed before end of input",
            Diagnostic::StrayQuote => "quote character inside an unquoted field",
            Diagnostic::TrailingAfterQuote => "unexpected bytes after closing quote",
        };
        f.write_str(message)
    }
}

/// One scanned field.
///
/// The lifetime `'a` refers to the scanned buffer; content is never copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Value<'a> {
    kind: ValueKind,
    consumed: usize,
    quoted: bool,
    content: &'a [u8],
    content_start: usize,
    escaped: bool,
    delimited: bool,
    diagnostic: Option<Diagnostic>,
}

impl<'a> Value<'a> {
    pub(crate) fn exhausted() -> Self {
        Self::empty(0, false)
    }

    pub(crate) fn empty(consumed: usize, quoted: bool) -> Self {
        Self {
            kind: ValueKind::Empty,
            consumed,
            quoted,
            content: &[],
            content_start: 0,
            escaped: false,
            delimited: false,
            diagnostic: None,
        }
    }

    /// A bare `,` at the start of the slice.
    pub(crate) fn empty_field() -> Self {
        Self {
            delimited: true,
            ..Self::empty(1, false)
        }
    }

    pub(crate) fn row_break() -> Self {
        Self {
            kind: ValueKind::RowBreak,
            ..Self::empty(2, false)
        }
    }

    /// Builds a field from its content span within `buf`.
    ///
    /// An empty span makes the field `Empty`, quoted or not.
    pub(crate) fn field(
        buf: &'a [u8],
        content: Range<usize>,
        consumed: usize,
        quoted: bool,
        escaped: bool,
        diagnostic: Option<Diagnostic>,
    ) -> Self {
        let kind = if content.is_empty() {
            ValueKind::Empty
        } else {
            ValueKind::Text
        };
        // Bytes past the content end are a closing quote, trailing junk or
        // the delimiter; junk never contains `,` and a row break is never consumed.
        let delimited = consumed > content.end && buf.get(consumed - 1) == Some(&b',');
        Self {
            kind,
            consumed,
            quoted,
            content_start: content.start,
            content: &buf[content],
            escaped,
            delimited,
            diagnostic,
        }
    }

    #[inline]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Bytes of the buffer taken by this field, including any trailing
    /// delimiter or row break.
    ///
    /// A field never consumes the CRLF that follows it, so when
    /// [`Value::has_delimiter`] is true and the next value is a row break
    /// (or the buffer ends), an empty last field follows.
    #[inline]
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// True if this field consumed a trailing `,`.
    #[inline]
    pub fn has_delimiter(&self) -> bool {
        self.delimited
    }

    #[inline]
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kind == ValueKind::Empty
    }

    #[inline]
    pub fn is_row_break(&self) -> bool {
        self.kind == ValueKind::RowBreak
    }

    /// Raw content span with the surrounding quotes stripped.
    ///
    /// Escaped quotes are still doubled here; use [`Value::unescaped`] to
    /// collapse them.
    #[inline]
    pub fn content(&self) -> &'a [u8] {
        self.content
    }

    /// Position of [`Value::content`] relative to the start of the scanned slice.
    pub fn content_range(&self) -> Range<usize> {
        self.content_start..self.content_start + self.content.len()
    }

    /// True if the content holds at least one doubled quote.
    #[inline]
    pub fn has_escapes(&self) -> bool {
        self.escaped
    }

    #[inline]
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        self.diagnostic
    }

    /// Content with doubled quotes collapsed. Borrows unless there is
    /// something to collapse.
    pub fn unescaped(&self) -> Cow<'a, [u8]> {
        if !self.escaped {
            return Cow::Borrowed(self.content);
        }

        let mut out = Vec::with_capacity(self.content.len());
        let mut rest = self.content;
        while let Some(pos) = memchr(b'"', rest) {
            out.extend_from_slice(&rest[..=pos]);
            let skip = if rest.get(pos + 1) == Some(&b'"') { 2 } else { 1 };
            rest = &rest[pos + skip..];
        }
        out.extend_from_slice(rest);
        Cow::Owned(out)
    }
}
