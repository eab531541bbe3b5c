//! Input byte decoding.
//!
//! The report generator usually emits UTF-8, but older producer versions
//! saved files in a Windows single-byte code page. Decoding is tried with an
//! ordered list of encodings; the first lossless decode wins. This is a thin
//! collaborator in front of the core pipeline, which works on decoded text.

use crate::error::{Error, Result};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// Ordered list of encodings to try.
const ENCODINGS: &[&Encoding] = &[UTF_8, WINDOWS_1252];

/// Decode raw input bytes into text.
///
/// Tries UTF-8 first, then Windows-1252. Returns the decoded text and the
/// name of the encoding that was used.
///
/// # Errors
///
/// Returns [`Error::Decode`] only if no candidate encoding produces a
/// decode without replacement characters. Windows-1252 maps every byte, so
/// in practice this fails only for empty-candidate configurations.
pub fn decode_report_bytes(bytes: &[u8]) -> Result<(String, &'static str)> {
    for encoding in ENCODINGS {
        let (text, _, had_errors) = encoding.decode(bytes);
        if !had_errors {
            log::debug!("Decoded {} bytes as {}", bytes.len(), encoding.name());
            return Ok((text.into_owned(), encoding.name()));
        }
    }
    Err(Error::Decode("no supported encoding decodes the input".to_string()))
}
