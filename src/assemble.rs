//! Document assembly pipeline.
//!
//! Fixed sequence: parse the markup, extract records, and feed them to the
//! renderer in a fixed section order. Sections with no records are omitted
//! entirely; trade ideas are grouped by resolved category. This module owns
//! no algorithm of its own, it sequences the others.

use crate::config::{ExtractionConfig, RenderConfig};
use crate::decode::decode_report_bytes;
use crate::error::Result;
use crate::extract::ReportExtractor;
use crate::markup::MarkupTree;
use crate::records::{Category, Record, TradeIdea, WatchlistEntry};
use crate::render::layout::HEADER_NAVY;
use crate::render::ReportRenderer;
use std::path::Path;

/// End-to-end markup-to-PDF pipeline.
#[derive(Debug, Clone, Default)]
pub struct ReportPipeline {
    extraction: ExtractionConfig,
    render: RenderConfig,
}

impl ReportPipeline {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the extraction tuning.
    pub fn with_extraction_config(mut self, config: ExtractionConfig) -> Self {
        self.extraction = config;
        self
    }

    /// Set the render configuration.
    pub fn with_render_config(mut self, config: RenderConfig) -> Self {
        self.render = config;
        self
    }

    /// Generate the paginated document from decoded markup text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotMarkup`] when the input cannot be parsed
    /// as markup; per-record problems never fail the run.
    pub fn generate(&self, markup: &str) -> Result<Vec<u8>> {
        let tree = MarkupTree::parse(markup)?;
        let extractor = ReportExtractor::with_config(self.extraction.clone());
        let records = extractor.extract(&tree);
        log::info!("extracted {} records", records.len());
        self.render_records(&records)
    }

    /// Generate from raw input bytes, decoding them first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Decode`] when no supported encoding decodes
    /// the bytes, or any error [`generate`](Self::generate) returns.
    pub fn generate_from_bytes(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        let (text, _) = decode_report_bytes(bytes)?;
        self.generate(&text)
    }

    /// Generate and write the document to a file.
    ///
    /// # Errors
    ///
    /// Returns any generation error, or [`crate::Error::Io`] on write
    /// failure.
    pub fn save(&self, markup: &str, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.generate(markup)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn render_records(&self, records: &[Record]) -> Result<Vec<u8>> {
        let sections = Sections::partition(records);
        let mut renderer = ReportRenderer::new(self.render.clone());

        if let Some((title, body)) = sections.alert {
            renderer.alert_box(title, body);
        }
        if let Some(metrics) = sections.snapshot {
            renderer.section_header("Index Snapshot", HEADER_NAVY, false);
            renderer.metric_pairs(metrics);
        }
        if let Some(blocks) = sections.commentary {
            renderer.section_header("Market Assessment", HEADER_NAVY, false);
            renderer.commentary(blocks);
        }
        render_idea_section(&mut renderer, "Open Positions", Category::Open, &sections.open);
        render_idea_section(&mut renderer, "Buy Ideas", Category::Buy, &sections.buy);
        render_idea_section(&mut renderer, "Reduce / Exit", Category::Sell, &sections.sell);
        if !sections.watchlist.is_empty() {
            renderer.section_header("Watchlist", Category::Watch.header_color(), true);
            for entry in &sections.watchlist {
                renderer.watch_card(entry);
            }
        }
        if let Some(bullets) = sections.notes {
            renderer.section_header("Market Notes", HEADER_NAVY, true);
            renderer.bullet_list(bullets);
        }
        if let Some((title, body)) = sections.disclaimer {
            renderer.disclaimer_box(title, body);
        }

        renderer.finish()
    }
}

fn render_idea_section(
    renderer: &mut ReportRenderer,
    title: &str,
    category: Category,
    ideas: &[&TradeIdea],
) {
    if ideas.is_empty() {
        return;
    }
    renderer.section_header(title, category.header_color(), true);
    for idea in ideas {
        renderer.trade_card(idea);
    }
}

/// Records regrouped into the fixed output section order.
#[derive(Default)]
struct Sections<'a> {
    alert: Option<(&'a str, &'a str)>,
    snapshot: Option<&'a [(String, String)]>,
    commentary: Option<&'a [crate::records::CommentaryBlock]>,
    open: Vec<&'a TradeIdea>,
    buy: Vec<&'a TradeIdea>,
    sell: Vec<&'a TradeIdea>,
    watchlist: Vec<&'a WatchlistEntry>,
    notes: Option<&'a [String]>,
    disclaimer: Option<(&'a str, &'a str)>,
}

impl<'a> Sections<'a> {
    fn partition(records: &'a [Record]) -> Self {
        let mut sections = Self::default();
        for record in records {
            match record {
                Record::AlertNotice { title, body } => {
                    sections.alert = Some((title, body));
                },
                Record::IndexSnapshot { metrics } => {
                    sections.snapshot = Some(metrics);
                },
                Record::Commentary { blocks } => {
                    sections.commentary = Some(blocks);
                },
                Record::TradeIdea(idea) => match idea.category {
                    Category::Open => sections.open.push(idea),
                    Category::Buy => sections.buy.push(idea),
                    Category::Sell | Category::Watch => sections.sell.push(idea),
                },
                Record::WatchlistEntry(entry) => sections.watchlist.push(entry),
                Record::NoteList { bullets } => {
                    sections.notes = Some(bullets);
                },
                Record::Disclaimer { title, body } => {
                    sections.disclaimer = Some((title, body));
                },
            }
        }
        sections
    }
}
