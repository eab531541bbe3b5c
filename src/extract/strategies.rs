//! Extraction strategies.
//!
//! Each strategy is a pure function over the parsed tree that attempts to
//! locate one record kind with one heuristic. Strategies never share state;
//! the engine in [`super`] tries them in a fixed priority order and keeps the
//! first non-empty, validated result.
//!
//! Priority tiers, highest confidence first:
//! 1. marker: a dedicated `data-record` attribute or the producer's known
//!    class name identifies the record unambiguously;
//! 2. keyword anchor: a known literal phrase is located, then the climb to
//!    the nearest container ancestor that also holds a corroborating field;
//! 3. fingerprint: a conjunction of required keywords over flattened text,
//!    taking the smallest enclosing container under a size cutoff.

use crate::classify::{scope_from_text, ScopeSignal};
use crate::config::ExtractionConfig;
use crate::markup::{
    child_elements, class_contains, climb, first_heading_or_strong, has_class, is_container,
    normalize_ws, selector, text_of, MarkupTree,
};
use crate::records::{CommentaryBlock, Record};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Selector};

lazy_static! {
    // Marker selectors (producer's stable classes + data-record attributes).
    static ref SEL_DATA_ALERT: Selector = selector(r#"[data-record="alert"]"#);
    static ref SEL_ALERT_BOX: Selector = selector(".alert-box");
    static ref SEL_DATA_INDEX: Selector = selector(r#"[data-record="index"]"#);
    static ref SEL_INDEX_CARD: Selector = selector(".index-card");
    static ref SEL_METRIC_ROW: Selector = selector(".metric-row");
    static ref SEL_METRIC_LABEL: Selector = selector(".metric-label");
    static ref SEL_METRIC_VALUE: Selector = selector(".metric-value");
    static ref SEL_DATA_COMMENTARY: Selector = selector(r#"[data-record="commentary"]"#);
    static ref SEL_ASSESSMENT: Selector = selector(".market-assessment");
    static ref SEL_DATA_IDEA: Selector = selector(r#"[data-record="idea"]"#);
    static ref SEL_SETUP_CARD: Selector = selector(".setup-card");
    static ref SEL_TICKER: Selector = selector(".ticker");
    static ref SEL_COMPANY: Selector = selector(".company-name");
    static ref SEL_SETUP_TYPE: Selector = selector(".setup-type");
    static ref SEL_DETAILS: Selector = selector(".technical-details");
    static ref SEL_PARAMS: Selector = selector(".trade-params");
    static ref SEL_PARAM_BOX: Selector = selector(".param-box");
    static ref SEL_PARAM_LABEL: Selector = selector(".param-label");
    static ref SEL_PARAM_VALUE: Selector = selector(".param-value");
    static ref SEL_RATIONALE: Selector = selector(".rationale");
    static ref SEL_CONFIDENCE: Selector = selector(".confidence");
    static ref SEL_WATCHLIST: Selector = selector(".watchlist");
    static ref SEL_WATCH_ITEM: Selector = selector(".watchlist-item");
    static ref SEL_DATA_WATCHLIST: Selector = selector(r#"[data-record="watchlist"]"#);
    static ref SEL_MARKET_NOTES: Selector = selector(".market-notes");
    static ref SEL_DATA_NOTES: Selector = selector(r#"[data-record="notes"]"#);
    static ref SEL_DISCLAIMER: Selector = selector(".disclaimer");
    static ref SEL_DATA_DISCLAIMER: Selector = selector(r#"[data-record="disclaimer"]"#);
    static ref SEL_SECTION_TITLE: Selector = selector(".section-title");

    // Generic element selectors.
    static ref SEL_P: Selector = selector("p");
    static ref SEL_LI: Selector = selector("li");
    static ref SEL_TR: Selector = selector("tr");
    static ref SEL_CELL: Selector = selector("td, th");
    static ref SEL_DT: Selector = selector("dt");
    static ref SEL_DD: Selector = selector("dd");
    static ref SEL_HEADINGS: Selector = selector("h1, h2, h3, h4, h5, h6");

    /// Ticker shape: 2-6 upper-case alphanumerics, optional exchange suffix.
    static ref RE_TICKER: Regex = Regex::new(r"^[A-Z][A-Z0-9]{1,5}(\.[A-Z]{1,3})?$").unwrap();

}

/// Labels that route a freeform "key: value" line into `parameters`.
/// Everything else becomes a detail line.
const PARAM_KEYWORDS: &[&str] = &[
    "entry", "target", "stop", "r:r", "current", "action", "decision", "gain", "loss",
];

/// Whether a freeform label belongs to the parameter table.
pub fn is_param_label(label: &str) -> bool {
    let label = label.to_lowercase();
    PARAM_KEYWORDS.iter().any(|k| label.contains(k))
}

// ---------------------------------------------------------------------------
// Alert notice
// ---------------------------------------------------------------------------

/// Marker strategy: `data-record="alert"` or the `alert-box` class.
pub fn alert_by_marker(tree: &MarkupTree, _config: &ExtractionConfig) -> Option<Record> {
    let el = tree
        .select_first(&SEL_DATA_ALERT)
        .or_else(|| tree.select_first(&SEL_ALERT_BOX))?;
    build_alert(el)
}

/// Keyword-anchor strategy: locate a caution keyword, climb to the nearest
/// container that also carries a title element.
pub fn alert_by_keyword(tree: &MarkupTree, config: &ExtractionConfig) -> Option<Record> {
    for keyword in ["caution", "warning", "alert"] {
        if let Some(anchor) = tree.find_text_anchor(keyword) {
            let container = climb(anchor, config.climb_limit, |a| {
                is_container(a) && first_heading_or_strong(a).is_some()
            });
            if let Some(container) = container {
                if let Some(record) = build_alert(container) {
                    return Some(record);
                }
            }
            // The anchor itself may be the whole notice (<p><strong>..</strong> ..</p>).
            if let Some(record) = build_alert(anchor) {
                return Some(record);
            }
        }
    }
    None
}

/// Assemble an alert record from its container: title from the nearest
/// heading/strong, body with the title substring removed.
fn build_alert(el: ElementRef<'_>) -> Option<Record> {
    let title = first_heading_or_strong(el).map(text_of)?;
    if title.is_empty() {
        return None;
    }
    let body = strip_title(&text_of(el), &title);
    if body.is_empty() {
        return None;
    }
    Some(Record::AlertNotice { title, body })
}

/// Remove the title from a flattened container text and tidy the seam.
///
/// The flattened text holds the title element's own occurrence first; when
/// the body repeats the title as a prefix ("CAUTION: ..."), that repeat is
/// stripped as well so the title never leaks into the rendered body.
fn strip_title(text: &str, title: &str) -> String {
    let stripped = text.replacen(title, "", 1);
    let stripped = stripped.trim_start();
    let stripped = stripped.strip_prefix(title).unwrap_or(stripped);
    normalize_ws(stripped.trim_start_matches([':', '-', ' ']))
}

// ---------------------------------------------------------------------------
// Index snapshot
// ---------------------------------------------------------------------------

/// Marker strategy: `data-record="index"` or the `index-card` class.
pub fn snapshot_by_marker(tree: &MarkupTree, _config: &ExtractionConfig) -> Option<Record> {
    let el = tree
        .select_first(&SEL_DATA_INDEX)
        .or_else(|| tree.select_first(&SEL_INDEX_CARD))?;
    let metrics = metric_pairs_of(el);
    if metrics.is_empty() {
        None
    } else {
        Some(Record::IndexSnapshot { metrics })
    }
}

/// Keyword-anchor strategy: locate a "current level" label and climb to a
/// container that corroborates with at least one more label/value pair.
pub fn snapshot_by_keyword(tree: &MarkupTree, config: &ExtractionConfig) -> Option<Record> {
    let anchor = tree.find_text_anchor("current level")?;
    let container = climb(anchor, config.climb_limit, |a| {
        is_container(a) && metric_pairs_of(a).len() >= 2
    })?;
    let metrics = metric_pairs_of(container);
    Some(Record::IndexSnapshot { metrics })
}

/// Fingerprint strategy: smallest container mentioning both support and
/// resistance levels, bounded by the size cutoff.
pub fn snapshot_by_fingerprint(tree: &MarkupTree, config: &ExtractionConfig) -> Option<Record> {
    let el =
        tree.smallest_container_with_all(&["support", "resistance"], config.fingerprint_max_text)?;
    let metrics = metric_pairs_of(el);
    if metrics.len() >= 2 {
        Some(Record::IndexSnapshot { metrics })
    } else {
        None
    }
}

/// Recover ordered (label, value) pairs from a container, trying layouts in
/// order: dedicated metric rows, definition lists, table rows, then
/// colon-delimited text lines.
fn metric_pairs_of(el: ElementRef<'_>) -> Vec<(String, String)> {
    // Dedicated label/value sub-elements.
    let mut pairs = Vec::new();
    for row in el.select(&SEL_METRIC_ROW) {
        let label = row.select(&SEL_METRIC_LABEL).next().map(text_of);
        let value = row.select(&SEL_METRIC_VALUE).next().map(text_of);
        if let (Some(label), Some(value)) = (label, value) {
            if !label.is_empty() && !value.is_empty() {
                pairs.push((label, value));
            }
        }
    }
    if !pairs.is_empty() {
        return pairs;
    }

    // <dt>/<dd> pairs.
    let labels: Vec<String> = el.select(&SEL_DT).map(text_of).collect();
    let values: Vec<String> = el.select(&SEL_DD).map(text_of).collect();
    if !labels.is_empty() && labels.len() == values.len() {
        return labels.into_iter().zip(values).collect();
    }

    // Two-cell table rows.
    for row in el.select(&SEL_TR) {
        let cells: Vec<String> = row.select(&SEL_CELL).map(text_of).collect();
        if cells.len() == 2 && !cells[0].is_empty() {
            pairs.push((cells[0].clone(), cells[1].clone()));
        }
    }
    if !pairs.is_empty() {
        return pairs;
    }

    // "Label: value" text lines.
    for line in el.select(&SEL_LI).chain(el.select(&SEL_P)) {
        if let Some((label, value)) = split_key_value(&text_of(line)) {
            pairs.push((label, value));
        }
    }
    pairs
}

/// Split "Label: value" text, rejecting lines without a short label.
///
/// The split point is the first colon followed by whitespace, so compound
/// labels like "R:R: 2.5" keep their inner colon. Labels longer than 40
/// characters are treated as prose, not key/value lines.
fn split_key_value(text: &str) -> Option<(String, String)> {
    let idx = text.find(": ")?;
    let label = text[..idx].trim();
    let value = text[idx + 1..].trim();
    if label.is_empty() || label.len() > 40 || value.is_empty() {
        return None;
    }
    Some((label.to_string(), value.to_string()))
}

// ---------------------------------------------------------------------------
// Commentary
// ---------------------------------------------------------------------------

/// Marker strategy: `data-record="commentary"` or the `market-assessment`
/// class.
pub fn commentary_by_marker(tree: &MarkupTree, _config: &ExtractionConfig) -> Option<Record> {
    let el = tree
        .select_first(&SEL_DATA_COMMENTARY)
        .or_else(|| tree.select_first(&SEL_ASSESSMENT))?;
    let blocks = commentary_blocks_of(el, None);
    if blocks.is_empty() {
        None
    } else {
        Some(Record::Commentary { blocks })
    }
}

/// Keyword-anchor strategy: a heading mentioning the market assessment, then
/// the climb to its enclosing container.
pub fn commentary_by_keyword(tree: &MarkupTree, config: &ExtractionConfig) -> Option<Record> {
    let heading = tree.select_all(&SEL_HEADINGS).into_iter().find(|h| {
        let text = text_of(*h).to_lowercase();
        text.contains("assessment") || text.contains("commentary") || text.contains("outlook")
    })?;
    let container = climb(heading, config.climb_limit, |a| {
        is_container(a) && a.select(&SEL_P).next().is_some()
    })?;
    let blocks = commentary_blocks_of(container, Some(heading));
    if blocks.is_empty() {
        None
    } else {
        Some(Record::Commentary { blocks })
    }
}

/// Walk a container in document order pairing sub-headings with the
/// paragraphs that follow them. `skip` excludes the section's own title.
fn commentary_blocks_of(
    el: ElementRef<'_>,
    skip: Option<ElementRef<'_>>,
) -> Vec<CommentaryBlock> {
    let mut blocks = Vec::new();
    let mut pending_heading: Option<String> = None;
    for node in el.descendants().filter_map(ElementRef::wrap) {
        if let Some(skip) = skip {
            if node.id() == skip.id() {
                continue;
            }
        }
        match node.value().name() {
            "h3" | "h4" | "h5" => {
                pending_heading = Some(text_of(node));
            },
            "p" => {
                let paragraph = text_of(node);
                if !paragraph.is_empty() {
                    blocks.push(CommentaryBlock {
                        heading: pending_heading.take(),
                        paragraph,
                    });
                }
            },
            _ => {},
        }
    }
    blocks
}

// ---------------------------------------------------------------------------
// Trade-idea cards
// ---------------------------------------------------------------------------

/// A trade-idea card before classification, plus the structural scope signal
/// recovered from its ancestors.
#[derive(Debug, Clone)]
pub struct CardDraft {
    /// Recovered ticker (validated non-empty).
    pub ticker: String,
    /// Company display name, possibly empty.
    pub company_name: String,
    /// Setup label, possibly empty.
    pub setup_label: String,
    /// Detail lines in document order.
    pub detail_lines: Vec<String>,
    /// Parameters in document order.
    pub parameters: IndexMap<String, String>,
    /// Rationale text, if any.
    pub rationale: Option<String>,
    /// Confidence label, if any.
    pub confidence_label: Option<String>,
    /// Ancestor scope signal, if any.
    pub scope: Option<ScopeSignal>,
}

/// Enumerate card containers by marker: `data-record="idea"` or the
/// `setup-card` class.
pub fn cards_by_marker<'a>(tree: &'a MarkupTree, _config: &ExtractionConfig) -> Vec<ElementRef<'a>> {
    let mut cards = tree.select_all(&SEL_DATA_IDEA);
    cards.extend(tree.select_all(&SEL_SETUP_CARD));
    cards
}

/// Enumerate card-like containers by class fragment: any container whose
/// class mentions "card", excluding index panels and watchlist regions.
pub fn cards_by_class_fragment<'a>(
    tree: &'a MarkupTree,
    _config: &ExtractionConfig,
) -> Vec<ElementRef<'a>> {
    tree.elements()
        .filter(|el| is_container(*el) && class_contains(*el, "card"))
        .filter(|el| !class_contains(*el, "index") && !class_contains(*el, "watch"))
        .collect()
}

/// Enumerate cards by regex fingerprint: containers whose flattened text
/// contains Entry AND Target AND Stop, keeping only the innermost match
/// under the size cutoff.
pub fn cards_by_fingerprint<'a>(
    tree: &'a MarkupTree,
    config: &ExtractionConfig,
) -> Vec<ElementRef<'a>> {
    let candidates: Vec<ElementRef<'a>> = tree
        .elements()
        .filter(|el| is_container(*el))
        .filter(|el| {
            let text = text_of(*el).to_lowercase();
            text.len() <= config.fingerprint_max_text
                && text.contains("entry")
                && text.contains("target")
                && text.contains("stop")
        })
        .collect();

    // Reject ancestors that merely enclose a finer match.
    candidates
        .iter()
        .copied()
        .filter(|el| {
            !candidates.iter().any(|other| {
                other.id() != el.id() && other.ancestors().any(|a| a.id() == el.id())
            })
        })
        .collect()
}

/// Whether a card element sits inside a watchlist region; such cards belong
/// to watchlist extraction and never become trade ideas. A region counts as
/// watchlist when its class mentions "watch" or its own section title does.
pub fn inside_watchlist(el: ElementRef<'_>) -> bool {
    el.ancestors().filter_map(ElementRef::wrap).any(|a| {
        class_contains(a, "watch")
            || child_elements(a).into_iter().any(|c| {
                has_class(c, "section-title") && text_of(c).to_lowercase().contains("watchlist")
            })
    })
}

/// Extract the fields of one card, trying labeled mode first and falling
/// back to freeform colon-delimited paragraphs. Returns `None` when no
/// ticker can be recovered; the caller drops such cards silently.
pub fn extract_card(el: ElementRef<'_>, config: &ExtractionConfig) -> Option<CardDraft> {
    let ticker = labeled_text(el, &SEL_TICKER)
        .filter(|t| !t.is_empty())
        .or_else(|| freeform_ticker(el))?;

    let company_name = labeled_text(el, &SEL_COMPANY)
        .or_else(|| freeform_company(el, &ticker))
        .unwrap_or_default();
    let mut setup_label = labeled_text(el, &SEL_SETUP_TYPE).unwrap_or_default();

    let mut detail_lines = Vec::new();
    let mut parameters = IndexMap::new();
    let mut rationale = labeled_rationale(el);
    let mut confidence_label = labeled_text(el, &SEL_CONFIDENCE).filter(|c| !c.is_empty());

    // Labeled mode: dedicated detail and parameter sub-elements.
    if let Some(details) = el.select(&SEL_DETAILS).next() {
        for p in details.select(&SEL_P) {
            let line = text_of(p);
            if !line.is_empty() {
                detail_lines.push(line);
            }
        }
    }
    if let Some(params) = el.select(&SEL_PARAMS).next() {
        for tile in params.select(&SEL_PARAM_BOX) {
            let label = tile.select(&SEL_PARAM_LABEL).next().map(text_of);
            let value = tile.select(&SEL_PARAM_VALUE).next().map(text_of);
            if let (Some(label), Some(value)) = (label, value) {
                if !label.is_empty() && !parameters.contains_key(&label) {
                    parameters.insert(label, value);
                }
            }
        }
    }

    // Freeform mode: colon-delimited paragraphs, routed by the parameter
    // keyword allow-list. Only runs for paragraphs outside the labeled
    // sub-elements so the two modes compose on partially-labeled cards.
    for p in el.select(&SEL_P).chain(el.select(&SEL_LI)) {
        if inside_any(p, el, &[&SEL_DETAILS, &SEL_PARAMS, &SEL_RATIONALE]) {
            continue;
        }
        let line = text_of(p);
        if line.is_empty() {
            continue;
        }
        if let Some((label, value)) = split_key_value(&line) {
            let lower = label.to_lowercase();
            if lower == "rationale" {
                if rationale.is_none() {
                    rationale = Some(value);
                }
                continue;
            }
            if lower.contains("confidence") || lower.contains("conviction") {
                if confidence_label.is_none() {
                    confidence_label = Some(value);
                }
                continue;
            }
            if lower == "setup" && setup_label.is_empty() {
                setup_label = value;
                continue;
            }
            if is_param_label(&label) {
                if !parameters.contains_key(&label) {
                    parameters.insert(label, value);
                }
                continue;
            }
        }
        detail_lines.push(line);
    }

    let scope = scope_of(el, config.climb_limit);

    Some(CardDraft {
        ticker,
        company_name,
        setup_label,
        detail_lines,
        parameters,
        rationale,
        confidence_label,
        scope,
    })
}

/// Text of the first match of `sel` inside `el`.
fn labeled_text(el: ElementRef<'_>, sel: &Selector) -> Option<String> {
    el.select(sel).next().map(text_of)
}

/// Rationale with the leading "Rationale:" label stripped.
fn labeled_rationale(el: ElementRef<'_>) -> Option<String> {
    let text = labeled_text(el, &SEL_RATIONALE)?;
    let text = text
        .strip_prefix("Rationale:")
        .map(str::trim)
        .unwrap_or(&text)
        .to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Freeform ticker recovery: the first heading/strong token shaped like an
/// exchange ticker.
fn freeform_ticker(el: ElementRef<'_>) -> Option<String> {
    let title = first_heading_or_strong(el).map(text_of)?;
    title
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_ascii_alphanumeric() && c != '.'))
        .find(|t| RE_TICKER.is_match(t))
        .map(str::to_string)
}

/// Freeform company name: the card title with the ticker token removed.
fn freeform_company(el: ElementRef<'_>, ticker: &str) -> Option<String> {
    let title = first_heading_or_strong(el).map(text_of)?;
    let name = normalize_ws(
        title
            .replacen(ticker, "", 1)
            .trim_matches(|c: char| c == '-' || c == ':' || c == '|' || c.is_whitespace()),
    );
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Whether `node` sits inside any `sels` match that is itself inside `card`.
fn inside_any(node: ElementRef<'_>, card: ElementRef<'_>, sels: &[&Selector]) -> bool {
    node.ancestors().filter_map(ElementRef::wrap).any(|a| {
        if a.id() == card.id() {
            return false;
        }
        sels.iter().any(|sel| sel.matches(&a))
    })
}

/// Climb a card's ancestors for a region scope marker: a section-title text,
/// a heading, or a scope-bearing class name.
fn scope_of(el: ElementRef<'_>, climb_limit: usize) -> Option<ScopeSignal> {
    for ancestor in el
        .ancestors()
        .filter_map(ElementRef::wrap)
        .take(climb_limit)
        // Stopping below the document root keeps the climb from adopting
        // some other region's title.
        .take_while(|a| !matches!(a.value().name(), "body" | "html"))
    {
        if let Some(title) = ancestor.select(&SEL_SECTION_TITLE).next() {
            if let Some(scope) = scope_from_text(&text_of(title)) {
                return Some(scope);
            }
        }
        if let Some(heading) = ancestor.select(&SEL_HEADINGS).next() {
            if let Some(scope) = scope_from_text(&text_of(heading)) {
                return Some(scope);
            }
        }
        let classes: Vec<&str> = ancestor.value().classes().collect();
        if let Some(scope) = scope_from_text(&classes.join(" ")) {
            return Some(scope);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Watchlist
// ---------------------------------------------------------------------------

/// Marker strategy: a `watchlist` region with `watchlist-item` children.
pub fn watchlist_by_marker(tree: &MarkupTree, _config: &ExtractionConfig) -> Vec<Record> {
    let region = tree
        .select_first(&SEL_DATA_WATCHLIST)
        .or_else(|| tree.select_first(&SEL_WATCHLIST));
    let Some(region) = region else {
        return Vec::new();
    };
    region
        .select(&SEL_WATCH_ITEM)
        .filter_map(watch_entry_of)
        .collect()
}

/// Keyword strategy: a heading mentioning the watchlist, whose enclosing
/// container's titled children become entries.
pub fn watchlist_by_keyword(tree: &MarkupTree, config: &ExtractionConfig) -> Vec<Record> {
    let Some(heading) = tree.select_all(&SEL_HEADINGS).into_iter().find(|h| {
        text_of(*h).to_lowercase().contains("watchlist")
    }) else {
        return Vec::new();
    };
    let Some(region) = climb(heading, config.climb_limit, is_container) else {
        return Vec::new();
    };
    child_elements(region)
        .into_iter()
        .filter(|c| is_container(*c) && first_heading_or_strong(*c).is_some())
        .filter_map(watch_entry_of)
        .collect()
}

/// Build one watchlist entry: title from the item's heading, remaining lines
/// routed between parameters and details by the shared allow-list.
fn watch_entry_of(item: ElementRef<'_>) -> Option<Record> {
    let title = first_heading_or_strong(item).map(text_of).filter(|t| !t.is_empty())?;
    let mut detail_lines = Vec::new();
    let mut parameters = IndexMap::new();
    for p in item.select(&SEL_P) {
        let line = text_of(p);
        if line.is_empty() {
            continue;
        }
        match split_key_value(&line) {
            Some((label, value)) if is_param_label(&label) => {
                if !parameters.contains_key(&label) {
                    parameters.insert(label, value);
                }
            },
            _ => detail_lines.push(line),
        }
    }
    Some(Record::WatchlistEntry(crate::records::WatchlistEntry {
        title,
        detail_lines,
        parameters,
    }))
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

/// Marker strategy: the `market-notes` container's list items.
pub fn notes_by_marker(tree: &MarkupTree, _config: &ExtractionConfig) -> Option<Record> {
    let el = tree
        .select_first(&SEL_DATA_NOTES)
        .or_else(|| tree.select_first(&SEL_MARKET_NOTES))?;
    bullets_of(el)
}

/// Keyword strategy: a heading mentioning notes, then its container's list
/// items.
pub fn notes_by_keyword(tree: &MarkupTree, config: &ExtractionConfig) -> Option<Record> {
    let heading = tree
        .select_all(&SEL_HEADINGS)
        .into_iter()
        .find(|h| text_of(*h).to_lowercase().contains("notes"))?;
    let container = climb(heading, config.climb_limit, |a| {
        is_container(a) && a.select(&SEL_LI).next().is_some()
    })?;
    bullets_of(container)
}

fn bullets_of(el: ElementRef<'_>) -> Option<Record> {
    let bullets: Vec<String> = el
        .select(&SEL_LI)
        .map(text_of)
        .filter(|t| !t.is_empty())
        .collect();
    if bullets.is_empty() {
        None
    } else {
        Some(Record::NoteList { bullets })
    }
}

// ---------------------------------------------------------------------------
// Disclaimer
// ---------------------------------------------------------------------------

/// Marker strategy: `data-record="disclaimer"` or the `disclaimer` class.
pub fn disclaimer_by_marker(tree: &MarkupTree, _config: &ExtractionConfig) -> Option<Record> {
    let el = tree
        .select_first(&SEL_DATA_DISCLAIMER)
        .or_else(|| tree.select_first(&SEL_DISCLAIMER))?;
    build_disclaimer(el)
}

/// Keyword strategy: locate the standard disclaimer phrase and climb to its
/// container.
pub fn disclaimer_by_keyword(tree: &MarkupTree, config: &ExtractionConfig) -> Option<Record> {
    for keyword in ["disclaimer", "informational purposes"] {
        if let Some(anchor) = tree.find_text_anchor(keyword) {
            let container =
                climb(anchor, config.climb_limit, is_container).unwrap_or(anchor);
            if let Some(record) = build_disclaimer(container) {
                return Some(record);
            }
        }
    }
    None
}

fn build_disclaimer(el: ElementRef<'_>) -> Option<Record> {
    let text = text_of(el);
    if text.is_empty() {
        return None;
    }
    match first_heading_or_strong(el).map(text_of) {
        Some(title) if !title.is_empty() => {
            let body = strip_title(&text, &title);
            if body.is_empty() {
                None
            } else {
                Some(Record::Disclaimer { title, body })
            }
        },
        _ => Some(Record::Disclaimer {
            title: "Disclaimer".to_string(),
            body: text,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Record;

    fn tree(html: &str) -> MarkupTree {
        MarkupTree::parse(html).unwrap()
    }

    fn config() -> ExtractionConfig {
        ExtractionConfig::default()
    }

    #[test]
    fn test_alert_by_marker_strips_title_from_body() {
        let t = tree(
            r#"<div class="alert-box"><h3>EXTREME CAUTION</h3>
               <p>EXTREME CAUTION: Do not average down</p></div>"#,
        );
        let record = alert_by_marker(&t, &config()).unwrap();
        match record {
            Record::AlertNotice { title, body } => {
                assert_eq!(title, "EXTREME CAUTION");
                assert_eq!(body, "Do not average down");
            },
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn test_alert_by_keyword_climbs_to_titled_container() {
        let t = tree(
            r#"<div><div class="warn-strip"><strong>Risk Warning</strong>
               <span>Leverage cuts both ways today</span></div></div>"#,
        );
        let record = alert_by_keyword(&t, &config()).unwrap();
        match record {
            Record::AlertNotice { title, body } => {
                assert_eq!(title, "Risk Warning");
                assert!(body.contains("Leverage cuts both ways"));
            },
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn test_snapshot_by_marker_orders_metrics() {
        let t = tree(
            r#"<div class="index-card">
                 <div class="metric-row"><span class="metric-label">Current Level</span><span class="metric-value">47,662</span></div>
                 <div class="metric-row"><span class="metric-label">Support</span><span class="metric-value">46,800</span></div>
               </div>"#,
        );
        let record = snapshot_by_marker(&t, &config()).unwrap();
        match record {
            Record::IndexSnapshot { metrics } => {
                assert_eq!(metrics[0].0, "Current Level");
                assert_eq!(metrics[1].1, "46,800");
            },
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn test_snapshot_by_keyword_uses_colon_lines() {
        let t = tree(
            r#"<div><ul>
                 <li>Current Level: 47,662</li>
                 <li>Resistance: 48,100</li>
               </ul></div>"#,
        );
        let record = snapshot_by_keyword(&t, &config()).unwrap();
        match record {
            Record::IndexSnapshot { metrics } => {
                assert_eq!(metrics.len(), 2);
                assert_eq!(metrics[0].0, "Current Level");
            },
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn test_commentary_pairs_headings_with_paragraphs() {
        let t = tree(
            r#"<div class="market-assessment">
                 <h3>Short Term</h3><p>Consolidation likely.</p>
                 <p>Volume remains thin.</p>
               </div>"#,
        );
        let record = commentary_by_marker(&t, &config()).unwrap();
        match record {
            Record::Commentary { blocks } => {
                assert_eq!(blocks.len(), 2);
                assert_eq!(blocks[0].heading.as_deref(), Some("Short Term"));
                assert_eq!(blocks[1].heading, None);
            },
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn test_extract_card_labeled_mode() {
        let t = tree(
            r#"<div class="setup-card">
                 <span class="ticker">COMI</span>
                 <span class="company-name">Commercial International Bank</span>
                 <span class="setup-type">Accumulate</span>
                 <div class="technical-details"><p>Bounced off the 50-day.</p></div>
                 <div class="trade-params">
                   <div class="param-box"><span class="param-label">Entry</span><span class="param-value">10.50</span></div>
                   <div class="param-box"><span class="param-label">Target</span><span class="param-value">12.00</span></div>
                   <div class="param-box"><span class="param-label">Stop</span><span class="param-value">9.80</span></div>
                 </div>
                 <div class="rationale">Rationale: Favorable risk/reward.</div>
                 <span class="confidence">HIGH CONVICTION</span>
               </div>"#,
        );
        let card = t.select_first(&SEL_SETUP_CARD).unwrap();
        let draft = extract_card(card, &config()).unwrap();
        assert_eq!(draft.ticker, "COMI");
        assert_eq!(draft.company_name, "Commercial International Bank");
        assert_eq!(draft.setup_label, "Accumulate");
        assert_eq!(draft.detail_lines, vec!["Bounced off the 50-day."]);
        let keys: Vec<&str> = draft.parameters.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Entry", "Target", "Stop"]);
        assert_eq!(draft.rationale.as_deref(), Some("Favorable risk/reward."));
        assert_eq!(draft.confidence_label.as_deref(), Some("HIGH CONVICTION"));
    }

    #[test]
    fn test_extract_card_freeform_mode() {
        let t = tree(
            r#"<div class="idea-card">
                 <h4>ETEL - Telecom Egypt</h4>
                 <p>Entry: 28.40</p>
                 <p>Target: 31.00</p>
                 <p>Stop: 27.10</p>
                 <p>Momentum building above the 20-day average.</p>
               </div>"#,
        );
        let cards = cards_by_class_fragment(&t, &config());
        assert_eq!(cards.len(), 1);
        let draft = extract_card(cards[0], &config()).unwrap();
        assert_eq!(draft.ticker, "ETEL");
        assert_eq!(draft.company_name, "Telecom Egypt");
        let keys: Vec<&str> = draft.parameters.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Entry", "Target", "Stop"]);
        assert_eq!(draft.detail_lines, vec!["Momentum building above the 20-day average."]);
    }

    #[test]
    fn test_extract_card_without_ticker_is_dropped() {
        let t = tree(r#"<div class="setup-card"><p>Entry: 1.00</p></div>"#);
        let card = t.select_first(&SEL_SETUP_CARD).unwrap();
        assert!(extract_card(card, &config()).is_none());
    }

    #[test]
    fn test_cards_by_fingerprint_keeps_innermost() {
        let t = tree(
            r#"<div class="wrapper">
                 <div class="inner"><b>SWDY</b> Entry: 40 Target: 45 Stop: 38</div>
               </div>"#,
        );
        let cards = cards_by_fingerprint(&t, &config());
        assert_eq!(cards.len(), 1);
        assert!(has_class(cards[0], "inner"));
    }

    #[test]
    fn test_scope_recovered_from_section_title() {
        let t = tree(
            r#"<div class="section"><div class="section-title">Reduce / Exit</div>
                 <div class="setup-card"><span class="ticker">HRHO</span>
                   <span class="setup-type">Take Profit</span></div>
               </div>"#,
        );
        let card = t.select_first(&SEL_SETUP_CARD).unwrap();
        let draft = extract_card(card, &config()).unwrap();
        assert_eq!(draft.scope, Some(ScopeSignal::ReduceExit));
    }

    #[test]
    fn test_watchlist_by_marker() {
        let t = tree(
            r#"<div class="watchlist">
                 <div class="watchlist-item"><h4>ABUK - Abu Qir</h4>
                   <p>Trigger: break of 52.0</p>
                   <p>Watching volume.</p></div>
               </div>"#,
        );
        let records = watchlist_by_marker(&t, &config());
        assert_eq!(records.len(), 1);
        match &records[0] {
            Record::WatchlistEntry(entry) => {
                assert_eq!(entry.title, "ABUK - Abu Qir");
                assert_eq!(entry.detail_lines.len(), 2);
                assert!(entry.parameters.is_empty());
            },
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn test_notes_by_keyword() {
        let t = tree(
            r#"<div><h3>Technical Market Notes</h3>
               <ul><li>Breadth improving</li><li>EGP stable</li></ul></div>"#,
        );
        let record = notes_by_keyword(&t, &config()).unwrap();
        match record {
            Record::NoteList { bullets } => assert_eq!(bullets.len(), 2),
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn test_disclaimer_defaults_title() {
        let t = tree(r#"<footer><p>For informational purposes only. Not advice.</p></footer>"#);
        let record = disclaimer_by_keyword(&t, &config()).unwrap();
        match record {
            Record::Disclaimer { title, body } => {
                assert_eq!(title, "Disclaimer");
                assert!(body.contains("informational purposes"));
            },
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn test_disclaimer_body_repeating_title_is_cleaned() {
        let t = tree(
            r#"<div class="disclaimer"><strong>Disclaimer</strong>
               <p>Disclaimer: For informational purposes only.</p></div>"#,
        );
        let record = disclaimer_by_marker(&t, &config()).unwrap();
        match record {
            Record::Disclaimer { title, body } => {
                assert_eq!(title, "Disclaimer");
                assert_eq!(body, "For informational purposes only.");
            },
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn test_split_key_value_keeps_compound_label() {
        assert_eq!(
            split_key_value("R:R: 2.5"),
            Some(("R:R".to_string(), "2.5".to_string()))
        );
        assert_eq!(
            split_key_value("Entry: 10.50"),
            Some(("Entry".to_string(), "10.50".to_string()))
        );
        assert_eq!(split_key_value("No delimiter here"), None);
    }

    #[test]
    fn test_param_label_allow_list() {
        assert!(is_param_label("Entry"));
        assert!(is_param_label("R:R"));
        assert!(is_param_label("Current Price"));
        assert!(!is_param_label("Momentum"));
    }
}
