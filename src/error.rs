//! Error types for the report pipeline.
//!
//! Per-record extraction failures are not errors: a missing record kind means
//! the section is omitted, and a malformed candidate is dropped. Only an
//! unparseable input document (or an IO failure while saving) surfaces here.

/// Result type alias for report pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting a report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input could not be interpreted as a markup document at all.
    #[error("Input is not a markup document: {0}")]
    NotMarkup(String),

    /// Input bytes could not be decoded with any supported encoding.
    #[error("Input could not be decoded: {0}")]
    Decode(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_markup_error_message() {
        let err = Error::NotMarkup("no elements found".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("not a markup document"));
        assert!(msg.contains("no elements found"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
