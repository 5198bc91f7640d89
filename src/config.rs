/// Upper bound on values gathered by one [`FieldIterator::next_batch`](crate::FieldIterator::next_batch) call.
pub const DEFAULT_BATCH_CAPACITY: usize = 8192;

/// How the field iterator treats fields that carry a [`Diagnostic`](crate::Diagnostic).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanMode {
    /// Diagnostics stay attached to the value; iteration continues.
    #[default]
    Lenient,
    /// The first diagnostic ends iteration with [`ScanError::Malformed`](crate::ScanError::Malformed).
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    mode: ScanMode,
    batch_capacity: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            mode: ScanMode::default(),
            batch_capacity: DEFAULT_BATCH_CAPACITY,
        }
    }
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self::default().with_mode(ScanMode::Strict)
    }

    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the batch capacity. Zero is raised to one so batches always advance.
    pub fn with_batch_capacity(mut self, capacity: usize) -> Self {
        self.batch_capacity = capacity.max(1);
        self
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    pub fn batch_capacity(&self) -> usize {
        self.batch_capacity
    }
}
