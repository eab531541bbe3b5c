//! # Report Oxide
//!
//! Turns semi-structured market-report markup into a paginated PDF.
//!
//! The producer's HTML drifts between versions, so extraction runs a cascade
//! of typed strategies per record kind (structural marker, keyword anchor,
//! regex fingerprint) and keeps the first validated hit. Recovered records
//! are classified (Buy/Sell/Open/Watch), then rendered with a pre-measured
//! pagination engine: every block's height is computed before drawing, so no
//! block is ever split across a page boundary.
//!
//! ## Quick Start
//!
//! ```ignore
//! use report_oxide::{RenderConfig, ReportPipeline};
//!
//! # fn main() -> report_oxide::Result<()> {
//! let html = std::fs::read_to_string("daily_report.html")?;
//! let pipeline = ReportPipeline::new()
//!     .with_render_config(RenderConfig::new().with_banner_title("EGX30 Daily Report"));
//! pipeline.save(&html, "daily_report.pdf")?;
//! # Ok(())
//! # }
//! ```
//!
//! Malformed individual records are dropped and logged, never fatal; the
//! only error surfaced from a well-formed call is input that is not markup
//! at all.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Input decoding and parsing
pub mod decode;
pub mod markup;

// Record recovery
pub mod classify;
pub mod config;
pub mod extract;
pub mod records;

// Paginated output
pub mod render;

// Pipeline root
pub mod assemble;

pub use assemble::ReportPipeline;
pub use classify::{resolve, ClassificationSignals, ScopeSignal};
pub use config::{ExtractionConfig, RenderConfig};
pub use decode::decode_report_bytes;
pub use error::{Error, Result};
pub use extract::ReportExtractor;
pub use markup::MarkupTree;
pub use records::{Category, CommentaryBlock, Record, TradeIdea, WatchlistEntry};
pub use render::ReportRenderer;
