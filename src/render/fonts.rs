//! Font metrics and text measurement.
//!
//! Report pages are set entirely in the Helvetica family, so only its
//! Base-14 members are registered. Widths are the standard PostScript
//! metrics in 1/1000 em; measurement at a given size is exact for the
//! characters the tables cover and falls back to 500 units for the rest.

use std::collections::HashMap;

/// Regular body font.
pub const HELVETICA: &str = "Helvetica";
/// Bold font for headers, labels, and tickers.
pub const HELVETICA_BOLD: &str = "Helvetica-Bold";
/// Oblique font for rationale passages.
pub const HELVETICA_OBLIQUE: &str = "Helvetica-Oblique";

/// The font names every page's resource dictionary carries.
pub const PAGE_FONTS: &[&str] = &[HELVETICA, HELVETICA_BOLD, HELVETICA_OBLIQUE];

/// Resource name used inside content streams for a font.
pub fn resource_name(font_name: &str) -> String {
    font_name.replace('-', "")
}

/// Registered fonts with their width tables.
#[derive(Debug, Clone)]
pub struct FontManager {
    fonts: HashMap<&'static str, FontInfo>,
}

impl FontManager {
    /// Create a manager with the Helvetica family registered.
    pub fn new() -> Self {
        let mut fonts = HashMap::new();
        fonts.insert(HELVETICA, FontInfo::helvetica(false));
        fonts.insert(HELVETICA_BOLD, FontInfo::helvetica(true));
        // Oblique shares the regular widths.
        fonts.insert(HELVETICA_OBLIQUE, FontInfo::helvetica(false));
        Self { fonts }
    }

    /// Font info by name, falling back to regular Helvetica.
    pub fn get(&self, name: &str) -> &FontInfo {
        self.fonts.get(name).unwrap_or(&self.fonts[HELVETICA])
    }

    /// Width of a string in points at the given size.
    pub fn text_width(&self, text: &str, font_name: &str, font_size: f32) -> f32 {
        self.get(font_name).text_width(text, font_size)
    }
}

impl Default for FontManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Metrics for one font.
#[derive(Debug, Clone)]
pub struct FontInfo {
    widths: HashMap<char, f32>,
    /// Ascender height in 1/1000 em.
    pub ascender: f32,
    /// Descender depth in 1/1000 em (negative).
    pub descender: f32,
}

impl FontInfo {
    fn helvetica(bold: bool) -> Self {
        Self {
            widths: helvetica_widths(bold),
            ascender: 718.0,
            descender: -207.0,
        }
    }

    /// Width of text in points at the given size.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let units: f32 = text.chars().map(|c| self.char_width(c)).sum();
        units * font_size / 1000.0
    }

    /// Width of one character in 1/1000 em.
    pub fn char_width(&self, ch: char) -> f32 {
        *self.widths.get(&ch).unwrap_or(&500.0)
    }
}

/// Standard Helvetica / Helvetica-Bold ASCII widths.
fn helvetica_widths(bold: bool) -> HashMap<char, f32> {
    let mut widths = HashMap::new();

    widths.insert(' ', 278.0);
    widths.insert('.', 278.0);
    widths.insert(',', 278.0);
    widths.insert('-', 333.0);
    widths.insert(':', if bold { 333.0 } else { 278.0 });
    widths.insert(';', 278.0);
    widths.insert('!', 333.0);
    widths.insert('?', 500.0);
    widths.insert('\'', 222.0);
    widths.insert('"', 400.0);
    widths.insert('(', 333.0);
    widths.insert(')', 333.0);
    widths.insert('[', 333.0);
    widths.insert(']', 333.0);
    widths.insert('/', 278.0);
    widths.insert('\\', 278.0);
    widths.insert('%', 889.0);
    widths.insert('&', 722.0);
    widths.insert('*', 389.0);
    widths.insert('+', 584.0);
    widths.insert('=', 584.0);
    widths.insert('<', 584.0);
    widths.insert('>', 584.0);
    widths.insert('|', 280.0);
    widths.insert('_', 556.0);
    widths.insert('#', 556.0);
    widths.insert('$', 556.0);
    widths.insert('@', 800.0);
    widths.insert('\u{2022}', 350.0);

    for digit in '0'..='9' {
        widths.insert(digit, 556.0);
    }

    let uppercase = [
        ('A', 722.0),
        ('B', 722.0),
        ('C', 722.0),
        ('D', 722.0),
        ('E', 667.0),
        ('F', 611.0),
        ('G', 778.0),
        ('H', 722.0),
        ('I', 278.0),
        ('J', 556.0),
        ('K', 722.0),
        ('L', 611.0),
        ('M', 833.0),
        ('N', 722.0),
        ('O', 778.0),
        ('P', 667.0),
        ('Q', 778.0),
        ('R', 722.0),
        ('S', 667.0),
        ('T', 611.0),
        ('U', 722.0),
        ('V', 667.0),
        ('W', 944.0),
        ('X', 667.0),
        ('Y', 667.0),
        ('Z', 611.0),
    ];
    for (ch, w) in uppercase {
        widths.insert(ch, w);
    }

    let lowercase = if bold {
        [
            ('a', 556.0),
            ('b', 611.0),
            ('c', 556.0),
            ('d', 611.0),
            ('e', 556.0),
            ('f', 333.0),
            ('g', 611.0),
            ('h', 611.0),
            ('i', 278.0),
            ('j', 278.0),
            ('k', 556.0),
            ('l', 278.0),
            ('m', 889.0),
            ('n', 611.0),
            ('o', 611.0),
            ('p', 611.0),
            ('q', 611.0),
            ('r', 389.0),
            ('s', 556.0),
            ('t', 333.0),
            ('u', 611.0),
            ('v', 556.0),
            ('w', 778.0),
            ('x', 556.0),
            ('y', 556.0),
            ('z', 500.0),
        ]
    } else {
        [
            ('a', 556.0),
            ('b', 611.0),
            ('c', 556.0),
            ('d', 611.0),
            ('e', 556.0),
            ('f', 278.0),
            ('g', 611.0),
            ('h', 611.0),
            ('i', 222.0),
            ('j', 222.0),
            ('k', 556.0),
            ('l', 222.0),
            ('m', 833.0),
            ('n', 611.0),
            ('o', 611.0),
            ('p', 611.0),
            ('q', 611.0),
            ('r', 389.0),
            ('s', 556.0),
            ('t', 333.0),
            ('u', 611.0),
            ('v', 556.0),
            ('w', 778.0),
            ('x', 556.0),
            ('y', 556.0),
            ('z', 500.0),
        ]
    };
    for (ch, w) in lowercase {
        widths.insert(ch, w);
    }

    widths
}

/// Text measurement and wrapping used by the pre-measured layout pass.
#[derive(Debug, Clone, Default)]
pub struct TextLayout {
    fonts: FontManager,
}

impl TextLayout {
    /// Create a layout helper over the standard fonts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Width of a string in points.
    pub fn width(&self, text: &str, font_name: &str, font_size: f32) -> f32 {
        self.fonts.text_width(text, font_name, font_size)
    }

    /// Greedy word wrap within `max_width`.
    ///
    /// Returns `(line_text, line_width)` pairs. A single word wider than the
    /// column becomes its own overflowing line rather than being broken
    /// mid-word; the caller's column widths make this rare.
    pub fn wrap_text(
        &self,
        text: &str,
        font_name: &str,
        font_size: f32,
        max_width: f32,
    ) -> Vec<(String, f32)> {
        let space_width = self.fonts.text_width(" ", font_name, font_size);
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in text.split_whitespace() {
            let word_width = self.fonts.text_width(word, font_name, font_size);
            let needed = if current.is_empty() {
                word_width
            } else {
                current_width + space_width + word_width
            };
            if needed > max_width && !current.is_empty() {
                lines.push((std::mem::take(&mut current), current_width));
                current_width = 0.0;
            }
            if current.is_empty() {
                current.push_str(word);
                current_width = word_width;
            } else {
                current.push(' ');
                current.push_str(word);
                current_width += space_width + word_width;
            }
        }
        if !current.is_empty() {
            lines.push((current, current_width));
        }
        lines
    }
}
