//! Logical records recovered from a report document.
//!
//! Records are value objects: the extraction engine creates them, the
//! classification resolver finalizes trade-idea categories, and the layout
//! engine consumes them exactly once. Nothing mutates a record after
//! classification.

use indexmap::IndexMap;

/// Final category of a trade-idea record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// New long idea.
    Buy,
    /// Reduce/exit idea.
    Sell,
    /// Already-held position being tracked.
    Open,
    /// Watchlist candidate; never produced by the classifier itself.
    Watch,
}

impl Category {
    /// Header strip color for a card of this category (RGB, 0..=1).
    pub fn header_color(self) -> (f32, f32, f32) {
        match self {
            // Blue for accumulation, red for distribution.
            Category::Buy | Category::Open => (0.204, 0.596, 0.859),
            Category::Sell => (0.906, 0.298, 0.235),
            Category::Watch => (0.953, 0.612, 0.071),
        }
    }

    /// Badge color for the setup label chip.
    pub fn badge_color(self) -> (f32, f32, f32) {
        match self {
            Category::Buy | Category::Open => (0.180, 0.800, 0.443),
            Category::Sell => (0.753, 0.224, 0.169),
            Category::Watch => (0.902, 0.494, 0.133),
        }
    }
}

/// One paragraph of market commentary with an optional sub-heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentaryBlock {
    /// Sub-heading introducing the paragraph, when the producer emitted one.
    pub heading: Option<String>,
    /// Paragraph text.
    pub paragraph: String,
}

/// A single trade idea card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeIdea {
    /// Exchange ticker. Non-empty; unique across one document's output.
    pub ticker: String,
    /// Company display name.
    pub company_name: String,
    /// Setup label ("Accumulate", "Reduce Exposure", ...).
    pub setup_label: String,
    /// Resolved category. Always set once classification has run.
    pub category: Category,
    /// Free-form technical detail lines, in document order.
    pub detail_lines: Vec<String>,
    /// Trade parameters (Entry/Target/Stop/...), insertion order = document
    /// order, labels unique within the record.
    pub parameters: IndexMap<String, String>,
    /// Rationale text, if present.
    pub rationale: Option<String>,
    /// Confidence label ("HIGH CONVICTION", ...), if present.
    pub confidence_label: Option<String>,
}

/// A watchlist entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchlistEntry {
    /// Entry title line.
    pub title: String,
    /// Detail lines, in document order.
    pub detail_lines: Vec<String>,
    /// Optional parameters, same ordering rules as trade ideas.
    pub parameters: IndexMap<String, String>,
}

/// One recovered logical unit of report content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// Alert/caution notice.
    AlertNotice {
        /// Notice title.
        title: String,
        /// Notice body with the title substring removed.
        body: String,
    },
    /// Index-level metrics panel.
    IndexSnapshot {
        /// (label, value) pairs in document order.
        metrics: Vec<(String, String)>,
    },
    /// Market commentary passage.
    Commentary {
        /// Blocks in document order.
        blocks: Vec<CommentaryBlock>,
    },
    /// Trade idea card.
    TradeIdea(TradeIdea),
    /// Watchlist entry.
    WatchlistEntry(WatchlistEntry),
    /// Bulleted notes list.
    NoteList {
        /// Bullet texts in document order.
        bullets: Vec<String>,
    },
    /// Disclaimer passage.
    Disclaimer {
        /// Disclaimer title.
        title: String,
        /// Disclaimer body.
        body: String,
    },
}
