//! Extraction engine.
//!
//! Runs the strategy cascades in [`strategies`] over a parsed tree and
//! assembles the recovered records in a fixed section order. Singleton kinds
//! (alert, snapshot, commentary, notes, disclaimer) take the first strategy
//! that returns a validated record. Trade-idea cards are enumerated by every
//! tier in priority order and deduplicated, first by node identity (the same
//! container found twice) and then by ticker (the first-discovered card for
//! a ticker wins, whichever strategy found it).

pub mod strategies;

use crate::classify::{resolve, ClassificationSignals};
use crate::config::ExtractionConfig;
use crate::markup::MarkupTree;
use crate::records::{Record, TradeIdea};
use scraper::ElementRef;
use std::collections::HashSet;

use strategies::CardDraft;

type Strategy = for<'a> fn(&'a MarkupTree, &ExtractionConfig) -> Option<Record>;
type CardStrategy = for<'a> fn(&'a MarkupTree, &ExtractionConfig) -> Vec<ElementRef<'a>>;
type ListStrategy = for<'a> fn(&'a MarkupTree, &ExtractionConfig) -> Vec<Record>;

const ALERT_STRATEGIES: &[(&str, Strategy)] = &[
    ("marker", strategies::alert_by_marker),
    ("keyword-anchor", strategies::alert_by_keyword),
];

const SNAPSHOT_STRATEGIES: &[(&str, Strategy)] = &[
    ("marker", strategies::snapshot_by_marker),
    ("keyword-anchor", strategies::snapshot_by_keyword),
    ("fingerprint", strategies::snapshot_by_fingerprint),
];

const COMMENTARY_STRATEGIES: &[(&str, Strategy)] = &[
    ("marker", strategies::commentary_by_marker),
    ("keyword-anchor", strategies::commentary_by_keyword),
];

const NOTES_STRATEGIES: &[(&str, Strategy)] = &[
    ("marker", strategies::notes_by_marker),
    ("keyword-anchor", strategies::notes_by_keyword),
];

const DISCLAIMER_STRATEGIES: &[(&str, Strategy)] = &[
    ("marker", strategies::disclaimer_by_marker),
    ("keyword-anchor", strategies::disclaimer_by_keyword),
];

const CARD_STRATEGIES: &[(&str, CardStrategy)] = &[
    ("marker", strategies::cards_by_marker),
    ("class-fragment", strategies::cards_by_class_fragment),
    ("fingerprint", strategies::cards_by_fingerprint),
];

const WATCHLIST_STRATEGIES: &[(&str, ListStrategy)] = &[
    ("marker", strategies::watchlist_by_marker),
    ("keyword-anchor", strategies::watchlist_by_keyword),
];

/// Runs every extraction cascade over one document.
#[derive(Debug, Clone, Default)]
pub struct ReportExtractor {
    config: ExtractionConfig,
}

impl ReportExtractor {
    /// Create an extractor with default tuning.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with explicit tuning.
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Extract every recoverable record from the tree, in the fixed section
    /// order the renderer expects: alert, index snapshot, commentary, trade
    /// ideas, watchlist entries, notes, disclaimer.
    ///
    /// Absent sections are simply omitted; malformed items are dropped
    /// one-by-one without affecting their siblings.
    pub fn extract(&self, tree: &MarkupTree) -> Vec<Record> {
        let mut records = Vec::new();
        if let Some(r) = self.first_match("alert", ALERT_STRATEGIES, tree) {
            records.push(r);
        }
        if let Some(r) = self.first_match("index-snapshot", SNAPSHOT_STRATEGIES, tree) {
            records.push(r);
        }
        if let Some(r) = self.first_match("commentary", COMMENTARY_STRATEGIES, tree) {
            records.push(r);
        }
        records.extend(self.extract_trade_ideas(tree));
        records.extend(self.extract_watchlist(tree));
        if let Some(r) = self.first_match("notes", NOTES_STRATEGIES, tree) {
            records.push(r);
        }
        if let Some(r) = self.first_match("disclaimer", DISCLAIMER_STRATEGIES, tree) {
            records.push(r);
        }
        records
    }

    /// Run a singleton cascade; first validated record wins.
    fn first_match(
        &self,
        kind: &str,
        cascade: &[(&str, Strategy)],
        tree: &MarkupTree,
    ) -> Option<Record> {
        for (name, strategy) in cascade {
            if let Some(record) = strategy(tree, &self.config) {
                log::debug!("{} recovered by {} strategy", kind, name);
                return Some(record);
            }
        }
        log::debug!("{} not present", kind);
        None
    }

    /// Enumerate, deduplicate, extract, and classify trade-idea cards.
    fn extract_trade_ideas(&self, tree: &MarkupTree) -> Vec<Record> {
        let mut seen_nodes = HashSet::new();
        let mut seen_tickers = HashSet::new();
        let mut ideas = Vec::new();

        for (name, enumerate) in CARD_STRATEGIES {
            for card in enumerate(tree, &self.config) {
                if !seen_nodes.insert(card.id()) {
                    continue;
                }
                if strategies::inside_watchlist(card) {
                    continue;
                }
                let Some(draft) = strategies::extract_card(card, &self.config) else {
                    log::debug!("dropping card with no recoverable ticker ({})", name);
                    continue;
                };
                if !seen_tickers.insert(draft.ticker.clone()) {
                    log::debug!("dropping duplicate card for {} ({})", draft.ticker, name);
                    continue;
                }
                log::debug!("trade idea {} recovered by {} strategy", draft.ticker, name);
                ideas.push(Record::TradeIdea(classify_draft(draft)));
            }
        }
        ideas
    }

    /// Run the watchlist cascade; first non-empty entry set wins.
    fn extract_watchlist(&self, tree: &MarkupTree) -> Vec<Record> {
        for (name, strategy) in WATCHLIST_STRATEGIES {
            let entries = strategy(tree, &self.config);
            if !entries.is_empty() {
                log::debug!(
                    "watchlist recovered by {} strategy ({} entries)",
                    name,
                    entries.len()
                );
                return entries;
            }
        }
        Vec::new()
    }
}

/// Resolve the final category and seal the draft into a record.
fn classify_draft(draft: CardDraft) -> TradeIdea {
    let category = resolve(ClassificationSignals {
        scope: draft.scope,
        setup_label: &draft.setup_label,
    });
    TradeIdea {
        ticker: draft.ticker,
        company_name: draft.company_name,
        setup_label: draft.setup_label,
        category,
        detail_lines: draft.detail_lines,
        parameters: draft.parameters,
        rationale: draft.rationale,
        confidence_label: draft.confidence_label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Category;

    fn extract(html: &str) -> Vec<Record> {
        let tree = MarkupTree::parse(html).unwrap();
        ReportExtractor::new().extract(&tree)
    }

    #[test]
    fn test_empty_document_yields_no_records() {
        let records = extract("<html><body><p>nothing of note</p></body></html>");
        assert!(records.is_empty());
    }

    #[test]
    fn test_section_order_is_fixed() {
        let records = extract(
            r#"<body>
                 <div class="disclaimer"><strong>Disclaimer</strong><p>Not advice.</p></div>
                 <div class="setup-card"><span class="ticker">COMI</span>
                   <span class="setup-type">Accumulate</span></div>
                 <div class="alert-box"><h3>CAUTION</h3><p>Volatile session ahead.</p></div>
               </body>"#,
        );
        assert_eq!(records.len(), 3);
        assert!(matches!(records[0], Record::AlertNotice { .. }));
        assert!(matches!(records[1], Record::TradeIdea(_)));
        assert!(matches!(records[2], Record::Disclaimer { .. }));
    }

    #[test]
    fn test_duplicate_ticker_first_discovered_wins() {
        // The first card is found by the marker tier, the second only by the
        // fingerprint tier; both resolve to ETEL.
        let records = extract(
            r#"<body>
                 <div class="setup-card"><span class="ticker">ETEL</span>
                   <span class="setup-type">Accumulate</span>
                   <p>Entry: 28.40</p></div>
                 <div class="plain-box"><b>ETEL</b>
                   <p>Entry: 29.00</p><p>Target: 31.00</p><p>Stop: 27.00</p></div>
               </body>"#,
        );
        let ideas: Vec<&TradeIdea> = records
            .iter()
            .filter_map(|r| match r {
                Record::TradeIdea(idea) => Some(idea),
                _ => None,
            })
            .collect();
        assert_eq!(ideas.len(), 1);
        assert_eq!(ideas[0].setup_label, "Accumulate");
        assert_eq!(ideas[0].parameters.get("Entry").map(String::as_str), Some("28.40"));
    }

    #[test]
    fn test_cards_inside_watchlist_are_not_trade_ideas() {
        let records = extract(
            r#"<body><div class="watchlist">
                 <div class="watchlist-item"><h4>ABUK</h4><p>Trigger: 52.0</p></div>
               </div></body>"#,
        );
        assert!(records.iter().all(|r| !matches!(r, Record::TradeIdea(_))));
        assert!(records.iter().any(|r| matches!(r, Record::WatchlistEntry(_))));
    }

    #[test]
    fn test_scope_drives_classification() {
        let records = extract(
            r#"<body><div class="section">
                 <div class="section-title">Open Positions</div>
                 <div class="setup-card"><span class="ticker">SWDY</span>
                   <span class="setup-type">Hold</span></div>
               </div></body>"#,
        );
        match &records[0] {
            Record::TradeIdea(idea) => assert_eq!(idea.category, Category::Open),
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn test_label_fallback_classification() {
        let records = extract(
            r#"<body>
                 <div class="setup-card"><span class="ticker">HRHO</span>
                   <span class="setup-type">Reduce Exposure</span></div>
               </body>"#,
        );
        match &records[0] {
            Record::TradeIdea(idea) => assert_eq!(idea.category, Category::Sell),
            other => panic!("unexpected record: {:?}", other),
        }
    }
}
