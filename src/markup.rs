//! Parsed, read-only markup tree and navigation helpers.
//!
//! The producer's HTML is parsed once into a [`MarkupTree`]; every extraction
//! strategy reads from it and none of them mutate it. The helpers here are
//! the shared vocabulary of the strategies: normalized text flattening,
//! class/attribute matching, bounded ancestor climbs, and the
//! smallest-enclosing-container search used by fingerprint strategies.

use crate::error::{Error, Result};
use scraper::{ElementRef, Html, Selector};

/// A parsed markup document, immutable after construction.
pub struct MarkupTree {
    doc: Html,
}

impl MarkupTree {
    /// Parse input text into a markup tree.
    ///
    /// The underlying parser is error-recovering, so the only fatal case is
    /// input that is not markup at all: no tag-shaped token anywhere.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotMarkup`] for empty input or input containing no
    /// element tags.
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Err(Error::NotMarkup("input is empty".to_string()));
        }
        if !looks_like_markup(text) {
            return Err(Error::NotMarkup("no element tags found".to_string()));
        }
        Ok(Self {
            doc: Html::parse_document(text),
        })
    }

    /// First element matching the selector, in document order.
    pub fn select_first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.doc.select(selector).next()
    }

    /// All elements matching the selector, in document order.
    pub fn select_all(&self, selector: &Selector) -> Vec<ElementRef<'_>> {
        self.doc.select(selector).collect()
    }

    /// Iterate every element in the document, in document order.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.doc
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
    }

    /// Find the first element whose *own* text (direct text children, not
    /// descendants) contains the keyword, case-insensitively.
    pub fn find_text_anchor(&self, keyword: &str) -> Option<ElementRef<'_>> {
        let needle = keyword.to_lowercase();
        self.elements()
            .find(|el| own_text(*el).to_lowercase().contains(&needle))
    }

    /// Smallest element whose flattened text contains *all* keywords
    /// (case-insensitive) and does not exceed `max_text` characters.
    ///
    /// "Smallest" is by flattened-text length, which prefers the deepest
    /// enclosing container over coarse ancestors.
    pub fn smallest_container_with_all<'a>(
        &'a self,
        keywords: &[&str],
        max_text: usize,
    ) -> Option<ElementRef<'a>> {
        let needles: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
        let mut best: Option<(usize, ElementRef<'a>)> = None;
        for el in self.elements() {
            let text = text_of(el).to_lowercase();
            if text.len() > max_text {
                continue;
            }
            if needles.iter().all(|n| text.contains(n)) {
                match best {
                    Some((len, _)) if len <= text.len() => {},
                    _ => best = Some((text.len(), el)),
                }
            }
        }
        best.map(|(_, el)| el)
    }
}

/// Quick structural sniff: does the input contain at least one `<x` tag?
fn looks_like_markup(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes
        .windows(2)
        .any(|w| w[0] == b'<' && (w[1].is_ascii_alphabetic() || w[1] == b'/'))
}

/// Flattened text of an element with whitespace normalized.
pub fn text_of(el: ElementRef<'_>) -> String {
    let joined: String = el.text().collect::<Vec<_>>().join(" ");
    normalize_ws(&joined)
}

/// Text from the element's direct text children only.
pub fn own_text(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    for child in el.children() {
        if let Some(t) = child.value().as_text() {
            out.push_str(t);
            out.push(' ');
        }
    }
    normalize_ws(&out)
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether the element carries the exact class name.
pub fn has_class(el: ElementRef<'_>, name: &str) -> bool {
    el.value().classes().any(|c| c == name)
}

/// Whether any class name on the element contains the fragment
/// (case-insensitive). Bridges producer versions that rename classes
/// (`setup-card` vs `trade-card` vs `idea-card`).
pub fn class_contains(el: ElementRef<'_>, fragment: &str) -> bool {
    let fragment = fragment.to_lowercase();
    el.value()
        .classes()
        .any(|c| c.to_lowercase().contains(&fragment))
}

/// Direct element children.
pub fn child_elements(el: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    el.children().filter_map(ElementRef::wrap).collect()
}

/// Climb at most `limit` ancestor levels, returning the first ancestor that
/// satisfies the predicate.
pub fn climb<'a, F>(el: ElementRef<'a>, limit: usize, pred: F) -> Option<ElementRef<'a>>
where
    F: Fn(ElementRef<'a>) -> bool,
{
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .take(limit)
        .find(|a| pred(*a))
}

/// Whether the element is a block container worth treating as a record
/// boundary.
pub fn is_container(el: ElementRef<'_>) -> bool {
    matches!(
        el.value().name(),
        "div" | "section" | "article" | "aside" | "li" | "td" | "body" | "table" | "tr"
    )
}

/// First heading or emphasized element inside `el`, in document order.
/// Used to recover a record title when no dedicated title element exists.
pub fn first_heading_or_strong(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.descendants().filter_map(ElementRef::wrap).find(|d| {
        matches!(
            d.value().name(),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "strong" | "b"
        )
    })
}

/// Parse a selector known at compile time.
///
/// Only used with literal selector strings; a parse failure is a programmer
/// error, so this is intended for `lazy_static!` initializers.
pub fn selector(s: &str) -> Selector {
    Selector::parse(s).unwrap_or_else(|e| panic!("invalid selector `{}`: {:?}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(html: &str) -> MarkupTree {
        MarkupTree::parse(html).unwrap()
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(MarkupTree::parse("   ").is_err());
    }

    #[test]
    fn test_parse_rejects_plain_text() {
        assert!(MarkupTree::parse("just some words, 2 < 3 maybe").is_err());
    }

    #[test]
    fn test_parse_accepts_fragment() {
        assert!(MarkupTree::parse("<div>hello</div>").is_ok());
    }

    #[test]
    fn test_text_of_normalizes_whitespace() {
        let t = tree("<div> <p>a\n  b</p> <p>c</p> </div>");
        let sel = selector("div");
        let el = t.select_first(&sel).unwrap();
        assert_eq!(text_of(el), "a b c");
    }

    #[test]
    fn test_own_text_excludes_descendants() {
        let t = tree("<div>outer <span>inner</span> tail</div>");
        let sel = selector("div");
        let el = t.select_first(&sel).unwrap();
        assert_eq!(own_text(el), "outer tail");
    }

    #[test]
    fn test_find_text_anchor_case_insensitive() {
        let t = tree("<div><p>EXTREME CAUTION: stay out</p></div>");
        let anchor = t.find_text_anchor("caution").unwrap();
        assert_eq!(anchor.value().name(), "p");
    }

    #[test]
    fn test_class_contains() {
        let t = tree(r#"<div class="trade-card highlighted">x</div>"#);
        let sel = selector("div");
        let el = t.select_first(&sel).unwrap();
        assert!(class_contains(el, "card"));
        assert!(!class_contains(el, "watchlist"));
    }

    #[test]
    fn test_climb_respects_limit() {
        let t = tree(r#"<div class="outer"><div><div><p id="x">y</p></div></div></div>"#);
        let sel = selector("#x");
        let el = t.select_first(&sel).unwrap();
        assert!(climb(el, 1, |a| has_class(a, "outer")).is_none());
        assert!(climb(el, 3, |a| has_class(a, "outer")).is_some());
    }

    #[test]
    fn test_smallest_container_prefers_deepest() {
        let t = tree(
            r#"<body><div class="big">noise
                 <div class="small">Entry 10 Target 12 Stop 9</div>
               </div></body>"#,
        );
        let el = t
            .smallest_container_with_all(&["entry", "target", "stop"], 500)
            .unwrap();
        assert!(has_class(el, "small"));
    }

    #[test]
    fn test_smallest_container_size_cutoff() {
        let t = tree(r#"<div>Entry 10 Target 12 Stop 9</div>"#);
        assert!(t.smallest_container_with_all(&["entry", "target", "stop"], 5).is_none());
    }

    #[test]
    fn test_first_heading_or_strong() {
        let t = tree("<div><p>lead</p><h3>Title</h3></div>");
        let sel = selector("div");
        let el = t.select_first(&sel).unwrap();
        let h = first_heading_or_strong(el).unwrap();
        assert_eq!(text_of(h), "Title");
    }
}
