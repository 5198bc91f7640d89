mod config;
mod error;
mod fields;
mod number;
mod scanner;
mod value;

pub use config::{DEFAULT_BATCH_CAPACITY, ScanConfig, ScanMode};
pub use error::ScanError;
pub use fields::{FieldIterator, ValueBatch};
pub use number::{Number, is_digit, is_number_start, parse_number};
pub use scanner::scan_value;
pub use value::{Diagnostic, Value, ValueKind};
