use std::error::Error;
use std::sync::Arc;

use thiserror::Error;

/// Error payload carried by an `Error` event.
///
/// Any error type can travel through a stream as long as it is thread safe, so
/// user producers wrap their own errors with `Arc::new(e)` before signalling
/// them.
pub type ObservableError = Arc<dyn Error + Send + Sync>;

/// Errors raised by the library's own operators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RxError {
    /// `element_at(index)` saw its source complete after only `len` values.
    #[error("element index {index} is out of range, source completed after {len} values")]
    ArgumentOutOfRange { index: usize, len: usize },

    /// A `Single` producer finished without delivering a value.
    #[error("sequence completed without emitting an element")]
    NoElements,
}

impl From<RxError> for ObservableError {
    fn from(e: RxError) -> Self {
        Arc::new(e)
    }
}
