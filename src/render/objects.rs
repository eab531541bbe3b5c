//! PDF object serialization.
//!
//! A small object model covering what report output needs: numbers, names,
//! literal strings, arrays, dictionaries, streams, and indirect references.
//! Serialization follows the PDF syntax rules (ISO 32000-1 Section 7.3).

use super::winansi;
use std::io::Write;

/// A PDF object.
#[derive(Debug, Clone)]
pub enum Object {
    /// Integer number.
    Integer(i64),
    /// Real number.
    Real(f64),
    /// Name object (`/Name`).
    Name(String),
    /// Literal string (`(text)`).
    String(String),
    /// Array of objects.
    Array(Vec<Object>),
    /// Dictionary; insertion order is preserved so output is deterministic.
    Dictionary(Vec<(String, Object)>),
    /// Stream with its dictionary and raw data.
    Stream {
        /// Stream dictionary entries (Length is supplied by the caller).
        dict: Vec<(String, Object)>,
        /// Raw stream bytes, already filtered if a Filter entry is present.
        data: Vec<u8>,
    },
    /// Indirect reference (`id 0 R`).
    Reference(u32),
}

impl Object {
    /// Shorthand for a name object.
    pub fn name(n: &str) -> Object {
        Object::Name(n.to_string())
    }

    /// Shorthand for a dictionary from literal pairs.
    pub fn dict(entries: Vec<(&str, Object)>) -> Object {
        Object::Dictionary(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    /// Shorthand for a rectangle array.
    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Object {
        Object::Array(vec![
            Object::Real(x0),
            Object::Real(y0),
            Object::Real(x1),
            Object::Real(y1),
        ])
    }
}

/// Serialize an object to bytes.
pub fn serialize(obj: &Object) -> Vec<u8> {
    let mut buf = Vec::new();
    // Writes to Vec<u8> cannot fail.
    write_object(&mut buf, obj).unwrap_or_default();
    buf
}

/// Serialize an indirect object definition.
///
/// Format: `{id} 0 obj\n{object}\nendobj\n`
pub fn serialize_indirect(id: u32, obj: &Object) -> Vec<u8> {
    let mut buf = Vec::new();
    let _ = writeln!(buf, "{} 0 obj", id);
    let _ = write_object(&mut buf, obj);
    let _ = write!(buf, "\nendobj\n");
    buf
}

fn write_object<W: Write>(w: &mut W, obj: &Object) -> std::io::Result<()> {
    match obj {
        Object::Integer(i) => write!(w, "{}", i),
        Object::Real(r) => write!(w, "{}", fmt_real(*r)),
        Object::Name(n) => write!(w, "/{}", n),
        Object::String(s) => write_string(w, s),
        Object::Array(arr) => {
            write!(w, "[")?;
            for (i, item) in arr.iter().enumerate() {
                if i > 0 {
                    write!(w, " ")?;
                }
                write_object(w, item)?;
            }
            write!(w, "]")
        },
        Object::Dictionary(dict) => write_dictionary(w, dict),
        Object::Stream { dict, data } => {
            write_dictionary(w, dict)?;
            write!(w, "\nstream\n")?;
            w.write_all(data)?;
            write!(w, "\nendstream")
        },
        Object::Reference(id) => write!(w, "{} 0 R", id),
    }
}

fn write_dictionary<W: Write>(w: &mut W, dict: &[(String, Object)]) -> std::io::Result<()> {
    write!(w, "<<")?;
    for (i, (key, value)) in dict.iter().enumerate() {
        if i > 0 {
            write!(w, " ")?;
        }
        write!(w, "/{} ", key)?;
        write_object(w, value)?;
    }
    write!(w, ">>")
}

/// Write a literal string as single-byte text, escaping the delimiters the
/// syntax reserves. Strings here carry document metadata; they go through
/// the same WinAnsi mapping as page text, which agrees with PDFDocEncoding
/// on the Latin-1 range report metadata uses.
fn write_string<W: Write>(w: &mut W, s: &str) -> std::io::Result<()> {
    let (bytes, _) = winansi::encode(s);
    w.write_all(b"(")?;
    for b in bytes {
        match b {
            b'(' | b')' | b'\\' => w.write_all(&[b'\\', b])?,
            b'\n' => w.write_all(b"\\n")?,
            b'\r' => w.write_all(b"\\r")?,
            _ => w.write_all(&[b])?,
        }
    }
    w.write_all(b")")
}

/// Format a real number without trailing zeros.
pub fn fmt_real(v: f64) -> String {
    if (v - v.round()).abs() < 1e-4 {
        format!("{}", v.round() as i64)
    } else {
        let s = format!("{:.3}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_dictionary_preserves_order() {
        let obj = Object::dict(vec![
            ("Type", Object::name("Page")),
            ("Parent", Object::Reference(2)),
        ]);
        let s = String::from_utf8(serialize(&obj)).unwrap();
        assert_eq!(s, "<</Type /Page /Parent 2 0 R>>");
    }

    #[test]
    fn test_serialize_rect_trims_reals() {
        let obj = Object::rect(0.0, 0.0, 595.0, 842.0);
        let s = String::from_utf8(serialize(&obj)).unwrap();
        assert_eq!(s, "[0 0 595 842]");
    }

    #[test]
    fn test_fmt_real_keeps_three_decimals() {
        assert_eq!(fmt_real(0.204), "0.204");
        assert_eq!(fmt_real(0.5), "0.5");
        assert_eq!(fmt_real(42.0), "42");
    }

    #[test]
    fn test_string_escaping() {
        let s = String::from_utf8(serialize(&Object::String("a (b) c\\".to_string()))).unwrap();
        assert_eq!(s, r"(a \(b\) c\\)");
    }

    #[test]
    fn test_string_non_ascii_written_as_single_bytes() {
        let bytes = serialize(&Object::String("Caf\u{e9} Report".to_string()));
        assert_eq!(bytes, b"(Caf\xE9 Report)".to_vec());
    }

    #[test]
    fn test_serialize_indirect_frames_object() {
        let bytes = serialize_indirect(3, &Object::Integer(7));
        let s = String::from_utf8(bytes).unwrap();
        assert_eq!(s, "3 0 obj\n7\nendobj\n");
    }
}
