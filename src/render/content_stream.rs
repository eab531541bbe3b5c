//! Page content stream builder.
//!
//! Collects the drawing operations one page needs and serializes them to
//! the operator sequence of a PDF content stream (ISO 32000-1 Sections 8-9).
//! Text is encoded to WinAnsi at insertion time; characters the encoding
//! cannot carry are transliterated or replaced rather than failing the run.

use super::fonts::resource_name;
use super::objects::fmt_real;
use super::winansi;
use crate::error::Result;
use std::io::Write;

/// How a rectangle is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    /// Fill only (f).
    Fill,
    /// Stroke only (S).
    Stroke,
    /// Fill then stroke (B).
    FillStroke,
}

/// One drawing operation.
#[derive(Debug, Clone)]
enum Op {
    FillColor(f32, f32, f32),
    StrokeColor(f32, f32, f32),
    LineWidth(f32),
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        paint: Paint,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
    Text {
        bytes: Vec<u8>,
        x: f32,
        y: f32,
        font: String,
        size: f32,
    },
}

/// Builder for one page's content stream.
#[derive(Debug, Default)]
pub struct ContentStream {
    operations: Vec<Op>,
}

impl ContentStream {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing has been drawn yet.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Set the fill color (rg).
    pub fn fill_color(&mut self, r: f32, g: f32, b: f32) -> &mut Self {
        self.operations.push(Op::FillColor(r, g, b));
        self
    }

    /// Set the stroke color (RG).
    pub fn stroke_color(&mut self, r: f32, g: f32, b: f32) -> &mut Self {
        self.operations.push(Op::StrokeColor(r, g, b));
        self
    }

    /// Set the stroke line width (w).
    pub fn line_width(&mut self, width: f32) -> &mut Self {
        self.operations.push(Op::LineWidth(width));
        self
    }

    /// Draw a rectangle with the current colors.
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, paint: Paint) -> &mut Self {
        self.operations.push(Op::Rect {
            x,
            y,
            width,
            height,
            paint,
        });
        self
    }

    /// Stroke a straight line.
    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> &mut Self {
        self.operations.push(Op::Line { x1, y1, x2, y2 });
        self
    }

    /// Show text at a baseline position in the given font.
    pub fn text(&mut self, text: &str, x: f32, y: f32, font: &str, size: f32) -> &mut Self {
        let (bytes, lossy) = winansi::encode(text);
        if lossy {
            log::debug!("transliterated unsupported characters in {:?}", text);
        }
        self.operations.push(Op::Text {
            bytes,
            x,
            y,
            font: font.to_string(),
            size,
        });
        self
    }

    /// Serialize the collected operations to content stream bytes.
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for op in &self.operations {
            match op {
                Op::FillColor(r, g, b) => {
                    writeln!(out, "{} {} {} rg", num(*r), num(*g), num(*b))?;
                },
                Op::StrokeColor(r, g, b) => {
                    writeln!(out, "{} {} {} RG", num(*r), num(*g), num(*b))?;
                },
                Op::LineWidth(w) => writeln!(out, "{} w", num(*w))?,
                Op::Rect {
                    x,
                    y,
                    width,
                    height,
                    paint,
                } => {
                    writeln!(out, "{} {} {} {} re", num(*x), num(*y), num(*width), num(*height))?;
                    let operator = match paint {
                        Paint::Fill => "f",
                        Paint::Stroke => "S",
                        Paint::FillStroke => "B",
                    };
                    writeln!(out, "{}", operator)?;
                },
                Op::Line { x1, y1, x2, y2 } => {
                    writeln!(out, "{} {} m", num(*x1), num(*y1))?;
                    writeln!(out, "{} {} l", num(*x2), num(*y2))?;
                    writeln!(out, "S")?;
                },
                Op::Text {
                    bytes,
                    x,
                    y,
                    font,
                    size,
                } => {
                    writeln!(out, "BT")?;
                    writeln!(out, "/{} {} Tf", resource_name(font), num(*size))?;
                    writeln!(out, "1 0 0 1 {} {} Tm", num(*x), num(*y))?;
                    out.extend_from_slice(b"(");
                    for b in bytes {
                        match b {
                            b'(' | b')' | b'\\' => {
                                out.push(b'\\');
                                out.push(*b);
                            },
                            _ => out.push(*b),
                        }
                    }
                    writeln!(out, ") Tj")?;
                    writeln!(out, "ET")?;
                },
            }
        }
        Ok(out)
    }
}

fn num(v: f32) -> String {
    fmt_real(v as f64)
}
