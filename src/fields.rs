use tracing::{debug, trace};

use crate::config::{ScanConfig, ScanMode};
use crate::error::ScanError;
use crate::scanner::scan_value;
use crate::value::Value;

/// Values gathered by [`FieldIterator::next_batch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueBatch<'a> {
    pub values: Vec<Value<'a>>,
    /// True once the buffer has no bytes left to scan.
    pub done: bool,
}

/// Walks a buffer field by field.
///
/// Each call scans at the current offset and advances by the bytes the
/// field consumed. Iteration ends at end of buffer, or after the first
/// error.
#[derive(Debug, Clone)]
pub struct FieldIterator<'a> {
    buf: &'a [u8],
    offset: usize,
    config: ScanConfig,
    failed: bool,
    pending: Option<ScanError>,
}

impl<'a> FieldIterator<'a> {
    /// Creates a lenient iterator over `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_config(buf, ScanConfig::default())
    }

    pub fn with_config(buf: &'a [u8], config: ScanConfig) -> Self {
        Self {
            buf,
            offset: 0,
            config,
            failed: false,
            pending: None,
        }
    }

    /// Offset of the next field to scan.
    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn is_done(&self) -> bool {
        self.failed || self.offset >= self.buf.len()
    }

    /// Starts over from the beginning of the buffer.
    pub fn reset(&mut self) {
        self.offset = 0;
        self.failed = false;
        self.pending = None;
    }

    /// Returns the next value, or `None` once the buffer is exhausted.
    pub fn next_value(&mut self) -> Option<Result<Value<'a>, ScanError>> {
        if self.is_done() {
            return None;
        }

        let offset = self.offset;
        let value = scan_value(&self.buf[offset..]);

        if value.consumed() == 0 {
            debug!(offset, "scan made no progress");
            self.failed = true;
            return Some(Err(ScanError::NoProgress { offset }));
        }

        if self.config.mode() == ScanMode::Strict {
            if let Some(diagnostic) = value.diagnostic() {
                debug!(offset, %diagnostic, "malformed field in strict mode");
                self.failed = true;
                return Some(Err(ScanError::Malformed { offset, diagnostic }));
            }
        }

        self.offset += value.consumed();
        Some(Ok(value))
    }

    /// Collects up to the configured batch capacity of values.
    ///
    /// When a scan fails after some values were collected, those values are
    /// returned first with `done` unset; the following call returns the error.
    pub fn next_batch(&mut self) -> Result<ValueBatch<'a>, ScanError> {
        if let Some(e) = self.pending.take() {
            return Err(e);
        }

        let capacity = self.config.batch_capacity();
        let remaining = self.buf.len().saturating_sub(self.offset);
        let mut values = Vec::with_capacity(capacity.min(remaining));

        while values.len() < capacity {
            match self.next_value() {
                Some(Ok(value)) => values.push(value),
                Some(Err(e)) if values.is_empty() => return Err(e),
                Some(Err(e)) => {
                    self.pending = Some(e);
                    break;
                }
                None => break,
            }
        }

        let done = self.is_done() && self.pending.is_none();
        trace!(count = values.len(), offset = self.offset, done, "batch collected");
        Ok(ValueBatch { values, done })
    }
}

impl<'a> Iterator for FieldIterator<'a> {
    type Item = Result<Value<'a>, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_value()
    }
}

impl std::iter::FusedIterator for FieldIterator<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Diagnostic, ValueKind};

    fn contents(data: &[u8]) -> Vec<(ValueKind, Vec<u8>)> {
        FieldIterator::new(data)
            .map(|v| {
                let v = v.unwrap();
                (v.kind(), v.unescaped().into_owned())
            })
            .collect()
    }

    #[test]
    fn test_two_fields() {
        let data = b"ab,cd";
        let mut fields = FieldIterator::new(data);

        let first = fields.next_value().unwrap().unwrap();
        assert_eq!(first.content(), b"ab");
        assert_eq!(first.consumed(), 3);

        let second = fields.next_value().unwrap().unwrap();
        assert_eq!(second.content(), b"cd");
        assert_eq!(second.consumed(), 2);

        assert!(fields.next_value().is_none());
        assert_eq!(fields.position(), data.len());
    }

    #[test]
    fn test_rows() {
        let data = b"a,\"b,c\"\r\n,\"\"\r\nd";

        assert_eq!(
            contents(data),
            vec![
                (ValueKind::Text, b"a".to_vec()),
                (ValueKind::Text, b"b,c".to_vec()),
                (ValueKind::RowBreak, vec![]),
                (ValueKind::Empty, vec![]),
                (ValueKind::Empty, vec![]),
                (ValueKind::RowBreak, vec![]),
                (ValueKind::Text, b"d".to_vec()),
            ]
        );
    }

    #[test]
    fn test_consumed_sums_to_length() {
        let data = b"x,\"y\"\"z\",,\r\n\"open";
        let total: usize = FieldIterator::new(data).map(|v| v.unwrap().consumed()).sum();

        assert_eq!(total, data.len());
    }

    #[test]
    fn test_empty_buffer() {
        let mut fields = FieldIterator::new(b"");

        assert!(fields.is_done());
        assert!(fields.next_value().is_none());
    }

    #[test]
    fn test_lenient_keeps_diagnostics() {
        let values: Vec<_> = FieldIterator::new(b"a\"b,\"c")
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(values[0].diagnostic(), Some(Diagnostic::StrayQuote));
        assert_eq!(values[1].diagnostic(), Some(Diagnostic::UnterminatedQuote));
    }

    #[test]
    fn test_strict_stops_on_diagnostic() {
        let mut fields = FieldIterator::with_config(b"ok,\"open", ScanConfig::strict());

        assert_eq!(fields.next_value().unwrap().unwrap().content(), b"ok");
        assert_eq!(
            fields.next_value().unwrap(),
            Err(ScanError::Malformed {
                offset: 3,
                diagnostic: Diagnostic::UnterminatedQuote,
            })
        );
        assert!(fields.next_value().is_none());
        assert_eq!(fields.position(), 3);
    }

    #[test]
    fn test_reset_restarts() {
        let data = b"1,2\r\n3";
        let mut fields = FieldIterator::new(data);

        let first: Vec<_> = fields.by_ref().collect();
        fields.reset();
        let second: Vec<_> = fields.collect();

        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn test_batches() {
        let data = b"a,b,c,d,e";
        let mut fields = FieldIterator::with_config(data, ScanConfig::new().with_batch_capacity(2));

        let batch = fields.next_batch().unwrap();
        assert_eq!(batch.values.len(), 2);
        assert!(!batch.done);

        let batch = fields.next_batch().unwrap();
        assert_eq!(batch.values.len(), 2);
        assert!(!batch.done);

        let batch = fields.next_batch().unwrap();
        assert_eq!(batch.values.len(), 1);
        assert_eq!(batch.values[0].content(), b"e");
        assert!(batch.done);
    }

    #[test]
    fn test_strict_batch_keeps_values_before_error() {
        let mut fields = FieldIterator::with_config(b"a,b,c,\"open", ScanConfig::strict());

        let batch = fields.next_batch().unwrap();
        let contents: Vec<_> = batch.values.iter().map(|v| v.content()).collect();
        assert_eq!(contents, vec![&b"a"[..], &b"b"[..], &b"c"[..]]);
        assert!(!batch.done);

        assert_eq!(
            fields.next_batch(),
            Err(ScanError::Malformed {
                offset: 6,
                diagnostic: Diagnostic::UnterminatedQuote,
            })
        );

        let batch = fields.next_batch().unwrap();
        assert!(batch.values.is_empty());
        assert!(batch.done);
    }

    #[test]
    fn test_reset_clears_pending_error() {
        let mut fields = FieldIterator::with_config(b"a,\"open", ScanConfig::strict());

        assert_eq!(fields.next_batch().unwrap().values.len(), 1);
        fields.reset();

        let batch = fields.next_batch().unwrap();
        assert_eq!(batch.values.len(), 1);
        assert!(!batch.done);
        assert!(fields.next_batch().is_err());
    }

    #[test]
    fn test_batch_surfaces_error() {
        let mut fields = FieldIterator::with_config(b"\"a\"b", ScanConfig::strict());

        let err = fields.next_batch().unwrap_err();
        assert_eq!(err.offset(), 0);
        assert!(matches!(
            err,
            ScanError::Malformed {
                diagnostic: Diagnostic::TrailingAfterQuote,
                ..
            }
        ));
    }
}
