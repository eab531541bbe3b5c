//! WinAnsi (CP1252) text encoding for content streams.
//!
//! Output text is drawn with Base-14 fonts under WinAnsiEncoding, so every
//! show-text string must be a single-byte sequence. ASCII and Latin-1 pass
//! through; the common typographic characters map to their CP1252 slots;
//! anything else is transliterated to a close ASCII form or replaced with
//! `?`. Replacement degrades fidelity but never fails the run.

/// Encode text as WinAnsi bytes.
///
/// Returns the encoded bytes and whether any character had to be replaced.
pub fn encode(text: &str) -> (Vec<u8>, bool) {
    let mut out = Vec::with_capacity(text.len());
    let mut lossy = false;
    for ch in text.chars() {
        match win_ansi_byte(ch) {
            Some(b) => out.push(b),
            None => {
                out.push(b'?');
                lossy = true;
            },
        }
    }
    (out, lossy)
}

/// Map one character to its WinAnsi byte, if representable.
fn win_ansi_byte(ch: char) -> Option<u8> {
    let code = ch as u32;
    match ch {
        _ if code < 0x80 => Some(code as u8),
        // Latin-1 supplement shares the upper range.
        _ if (0xA0..=0xFF).contains(&code) => Some(code as u8),
        '\u{20AC}' => Some(0x80), // euro sign
        '\u{2018}' => Some(0x91), // left single quote
        '\u{2019}' => Some(0x92), // right single quote
        '\u{201C}' => Some(0x93), // left double quote
        '\u{201D}' => Some(0x94), // right double quote
        '\u{2022}' => Some(0x95), // bullet
        '\u{2013}' => Some(0x96), // en dash
        '\u{2014}' => Some(0x97), // em dash
        '\u{2026}' => Some(0x85), // ellipsis
        '\u{2122}' => Some(0x99), // trade mark
        '\u{0152}' => Some(0x8C),
        '\u{0153}' => Some(0x9C),
        '\u{02C6}' => Some(0x88),
        '\u{2039}' => Some(0x8B),
        '\u{203A}' => Some(0x9B),
        '\u{201A}' => Some(0x82),
        '\u{201E}' => Some(0x84),
        '\u{2020}' => Some(0x86),
        '\u{2021}' => Some(0x87),
        '\u{2030}' => Some(0x89),
        _ => None,
    }
}
