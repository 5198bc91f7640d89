use thiserror::Error;

use crate::value::Diagnostic;

/// Errors from iterating over a CSV buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("No progress at offset {offset}: scan consumed zero bytes")]
    NoProgress { offset: usize },

    #[error("Malformed field at offset {offset}: {diagnostic}")]
    Malformed { offset: usize, diagnostic: Diagnostic },
}

impl ScanError {
    /// Offset into the document where the failing field starts.
    pub fn offset(&self) -> usize {
        match self {
            ScanError::NoProgress { offset } | ScanError::Malformed { offset, .. } => *offset,
        }
    }
}
