//! PDF document writer.
//!
//! Assembles complete documents with proper structure: header, body,
//! cross-reference table, and trailer. Pages collect their content through
//! [`ContentStream`] builders; `finish` serializes everything in one pass.

use super::content_stream::ContentStream;
use super::fonts::{resource_name, PAGE_FONTS};
use super::objects::{self, Object};
use crate::error::Result;
use std::io::Write;

/// Document-level writer settings.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// PDF version written to the header.
    pub version: String,
    /// Document title metadata.
    pub title: Option<String>,
    /// Document author metadata.
    pub author: Option<String>,
    /// Creator application metadata.
    pub creator: Option<String>,
    /// Whether to FlateDecode-compress content streams.
    pub compress: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            version: "1.7".to_string(),
            title: None,
            author: None,
            creator: Some("report_oxide".to_string()),
            compress: false,
        }
    }
}

impl WriterConfig {
    /// Set document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Enable or disable content stream compression.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

/// Compress data for a FlateDecode filter.
fn compress_data(data: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

struct PageData {
    width: f32,
    height: f32,
    content: ContentStream,
}

/// Builds a complete PDF document from pages of drawing operations.
pub struct PdfWriter {
    config: WriterConfig,
    pages: Vec<PageData>,
}

impl PdfWriter {
    /// Create a writer with default settings.
    pub fn new() -> Self {
        Self::with_config(WriterConfig::default())
    }

    /// Create a writer with explicit settings.
    pub fn with_config(config: WriterConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
        }
    }

    /// Add a page, returning its index.
    pub fn add_page(&mut self, width: f32, height: f32) -> usize {
        self.pages.push(PageData {
            width,
            height,
            content: ContentStream::new(),
        });
        self.pages.len() - 1
    }

    /// Content stream of the page at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of range; callers only use indices
    /// returned by [`add_page`](Self::add_page).
    pub fn page_content(&mut self, index: usize) -> &mut ContentStream {
        &mut self.pages[index].content
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Build the complete document.
    ///
    /// # Errors
    ///
    /// Returns an error if a content stream fails to serialize.
    pub fn finish(self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        let mut xref_offsets: Vec<(u32, usize)> = Vec::new();

        writeln!(output, "%PDF-{}", self.config.version)?;
        // Binary marker so transports treat the file as binary.
        output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        // Fixed id plan: catalog, pages, fonts, then (page, content) pairs,
        // info last.
        let catalog_id = 1u32;
        let pages_id = 2u32;
        let first_font_id = 3u32;
        let first_page_id = first_font_id + PAGE_FONTS.len() as u32;
        let info_id = first_page_id + 2 * self.pages.len() as u32;
        let object_count = info_id + 1;

        let font_resources: Vec<(String, Object)> = PAGE_FONTS
            .iter()
            .enumerate()
            .map(|(i, name)| {
                (
                    resource_name(name),
                    Object::Reference(first_font_id + i as u32),
                )
            })
            .collect();

        // Catalog.
        let catalog = Object::dict(vec![
            ("Type", Object::name("Catalog")),
            ("Pages", Object::Reference(pages_id)),
        ]);
        xref_offsets.push((catalog_id, output.len()));
        output.extend_from_slice(&objects::serialize_indirect(catalog_id, &catalog));

        // Page tree.
        let kids: Vec<Object> = (0..self.pages.len())
            .map(|i| Object::Reference(first_page_id + 2 * i as u32))
            .collect();
        let pages_obj = Object::dict(vec![
            ("Type", Object::name("Pages")),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(self.pages.len() as i64)),
        ]);
        xref_offsets.push((pages_id, output.len()));
        output.extend_from_slice(&objects::serialize_indirect(pages_id, &pages_obj));

        // Base-14 font objects.
        for (i, name) in PAGE_FONTS.iter().enumerate() {
            let font_id = first_font_id + i as u32;
            let font_obj = Object::dict(vec![
                ("Type", Object::name("Font")),
                ("Subtype", Object::name("Type1")),
                ("BaseFont", Object::name(name)),
                ("Encoding", Object::name("WinAnsiEncoding")),
            ]);
            xref_offsets.push((font_id, output.len()));
            output.extend_from_slice(&objects::serialize_indirect(font_id, &font_obj));
        }

        // Pages and their content streams.
        for (i, page) in self.pages.iter().enumerate() {
            let page_id = first_page_id + 2 * i as u32;
            let content_id = page_id + 1;

            let raw_content = page.content.build()?;
            let (content_bytes, compressed) = if self.config.compress {
                match compress_data(&raw_content) {
                    Ok(bytes) => (bytes, true),
                    Err(_) => (raw_content, false),
                }
            } else {
                (raw_content, false)
            };

            let page_obj = Object::dict(vec![
                ("Type", Object::name("Page")),
                ("Parent", Object::Reference(pages_id)),
                (
                    "MediaBox",
                    Object::rect(0.0, 0.0, page.width as f64, page.height as f64),
                ),
                ("Contents", Object::Reference(content_id)),
                (
                    "Resources",
                    Object::dict(vec![(
                        "Font",
                        Object::Dictionary(font_resources.clone()),
                    )]),
                ),
            ]);
            xref_offsets.push((page_id, output.len()));
            output.extend_from_slice(&objects::serialize_indirect(page_id, &page_obj));

            let mut content_dict = vec![(
                "Length".to_string(),
                Object::Integer(content_bytes.len() as i64),
            )];
            if compressed {
                content_dict.push(("Filter".to_string(), Object::name("FlateDecode")));
            }
            xref_offsets.push((content_id, output.len()));
            output.extend_from_slice(&objects::serialize_indirect(
                content_id,
                &Object::Stream {
                    dict: content_dict,
                    data: content_bytes,
                },
            ));
        }

        // Info metadata.
        let mut info_entries = Vec::new();
        if let Some(title) = &self.config.title {
            info_entries.push(("Title", Object::String(title.clone())));
        }
        if let Some(author) = &self.config.author {
            info_entries.push(("Author", Object::String(author.clone())));
        }
        if let Some(creator) = &self.config.creator {
            info_entries.push(("Creator", Object::String(creator.clone())));
        }
        let info_obj = Object::dict(info_entries);
        xref_offsets.push((info_id, output.len()));
        output.extend_from_slice(&objects::serialize_indirect(info_id, &info_obj));

        // Cross-reference table.
        let xref_start = output.len();
        writeln!(output, "xref")?;
        writeln!(output, "0 {}", object_count)?;
        writeln!(output, "0000000000 65535 f ")?;
        xref_offsets.sort_by_key(|(id, _)| *id);
        for (_, offset) in &xref_offsets {
            writeln!(output, "{:010} 00000 n ", offset)?;
        }

        let trailer = Object::dict(vec![
            ("Size", Object::Integer(object_count as i64)),
            ("Root", Object::Reference(catalog_id)),
            ("Info", Object::Reference(info_id)),
        ]);
        writeln!(output, "trailer")?;
        output.extend_from_slice(&objects::serialize(&trailer));
        writeln!(output)?;
        writeln!(output, "startxref")?;
        writeln!(output, "{}", xref_start)?;
        write!(output, "%%EOF")?;

        Ok(output)
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_structure() {
        let mut writer = PdfWriter::new();
        writer.add_page(595.0, 842.0);
        let bytes = writer.finish().unwrap();
        let content = String::from_utf8_lossy(&bytes);
        assert!(content.starts_with("%PDF-1.7"));
        assert!(content.contains("/Type /Catalog"));
        assert!(content.contains("/Type /Pages"));
        assert!(content.contains("/Type /Page"));
        assert!(content.contains("[0 0 595 842]"));
        assert!(content.ends_with("%%EOF"));
    }

    #[test]
    fn test_document_with_text() {
        let mut writer = PdfWriter::new();
        let page = writer.add_page(595.0, 842.0);
        writer
            .page_content(page)
            .text("Daily Report", 32.0, 800.0, "Helvetica-Bold", 16.0);
        let bytes = writer.finish().unwrap();
        let content = String::from_utf8_lossy(&bytes);
        assert!(content.contains("/BaseFont /Helvetica-Bold"));
        assert!(content.contains("/Encoding /WinAnsiEncoding"));
        assert!(content.contains("(Daily Report) Tj"));
    }

    #[test]
    fn test_metadata_written() {
        let config = WriterConfig::default()
            .with_title("Technical Report")
            .with_author("Research Desk");
        let mut writer = PdfWriter::with_config(config);
        writer.add_page(595.0, 842.0);
        let bytes = writer.finish().unwrap();
        let content = String::from_utf8_lossy(&bytes);
        assert!(content.contains("/Title (Technical Report)"));
        assert!(content.contains("/Author (Research Desk)"));
    }

    #[test]
    fn test_multiple_pages_counted() {
        let mut writer = PdfWriter::new();
        writer.add_page(595.0, 842.0);
        writer.add_page(595.0, 842.0);
        assert_eq!(writer.page_count(), 2);
        let bytes = writer.finish().unwrap();
        let content = String::from_utf8_lossy(&bytes);
        assert!(content.contains("/Count 2"));
    }

    #[test]
    fn test_compressed_stream_inflates_to_operators() {
        use std::io::Read;

        let config = WriterConfig::default().with_compress(true);
        let mut writer = PdfWriter::with_config(config);
        let page = writer.add_page(595.0, 842.0);
        writer
            .page_content(page)
            .text("compressible content", 32.0, 800.0, "Helvetica", 10.0);
        let bytes = writer.finish().unwrap();
        let content = String::from_utf8_lossy(&bytes);
        assert!(content.contains("/Filter /FlateDecode"));

        // Zlib may emit a stored block for short input, so the raw operator
        // bytes can legitimately appear verbatim. The real check is that the
        // stream inflates back to the drawing operators.
        let start = bytes
            .windows(7)
            .position(|w| w == b"stream\n")
            .expect("stream keyword")
            + 7;
        let end = start
            + bytes[start..]
                .windows(10)
                .position(|w| w == b"\nendstream")
                .expect("endstream keyword");
        let mut inflated = Vec::new();
        flate2::read::ZlibDecoder::new(&bytes[start..end])
            .read_to_end(&mut inflated)
            .expect("stream should inflate");
        let operators = String::from_utf8_lossy(&inflated);
        assert!(operators.contains("(compressible content) Tj"));
    }
}
