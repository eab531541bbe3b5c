//! Trade-idea category resolution.
//!
//! A card's category can be signaled in several places at once, and the
//! signals can disagree (a "Buy"-looking label inside a region scoped to
//! reduce/exit). The resolver evaluates a declared priority list:
//!
//! 1. enclosing structural scope (ancestor region marker),
//! 2. setup-label keywords,
//! 3. default Buy.
//!
//! A later signal is consulted only when every earlier signal is absent.
//! Watchlist entries never pass through this path; they are recognized
//! structurally and carry [`Category::Watch`] from the start.

use crate::records::Category;

/// Structural scope recovered from an ancestor region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeSignal {
    /// Region explicitly scoped to currently-held positions.
    OpenPositions,
    /// Region explicitly scoped to reduce/exit ideas.
    ReduceExit,
    /// Region explicitly scoped to new buy ideas.
    BuyIdeas,
}

/// The inputs the resolver weighs for one card.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationSignals<'a> {
    /// Scope marker found by climbing the card's ancestors, if any.
    pub scope: Option<ScopeSignal>,
    /// The card's setup label text.
    pub setup_label: &'a str,
}

/// Resolve the final category for a trade-idea card.
pub fn resolve(signals: ClassificationSignals<'_>) -> Category {
    if let Some(scope) = signals.scope {
        return match scope {
            ScopeSignal::OpenPositions => Category::Open,
            ScopeSignal::ReduceExit => Category::Sell,
            ScopeSignal::BuyIdeas => Category::Buy,
        };
    }
    if label_signals_sell(signals.setup_label) {
        return Category::Sell;
    }
    Category::Buy
}

/// Whether the setup label alone signals a sell-side idea.
fn label_signals_sell(label: &str) -> bool {
    let label = label.to_lowercase();
    ["exit", "reduce", "sell", "distribution"]
        .iter()
        .any(|k| label.contains(k))
}

/// Map a region's title or class text to a scope signal, if it carries one.
///
/// Used by the extraction engine while climbing a card's ancestors; kept
/// here so every scope keyword lives next to the precedence rules.
pub fn scope_from_text(text: &str) -> Option<ScopeSignal> {
    let text = text.to_lowercase();
    if text.contains("open position") || text.contains("holding") {
        return Some(ScopeSignal::OpenPositions);
    }
    if text.contains("reduce") || text.contains("exit") || text.contains("sell") {
        return Some(ScopeSignal::ReduceExit);
    }
    if text.contains("buy") || text.contains("accumulat") || text.contains("new idea") {
        return Some(ScopeSignal::BuyIdeas);
    }
    None
}
