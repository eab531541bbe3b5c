//! Integration tests for record extraction across markup variants.

use report_oxide::{
    Category, ExtractionConfig, MarkupTree, Record, ReportExtractor, TradeIdea,
};

fn extract(html: &str) -> Vec<Record> {
    let tree = MarkupTree::parse(html).expect("sample should parse");
    ReportExtractor::new().extract(&tree)
}

fn trade_ideas(records: &[Record]) -> Vec<&TradeIdea> {
    records
        .iter()
        .filter_map(|r| match r {
            Record::TradeIdea(idea) => Some(idea),
            _ => None,
        })
        .collect()
}

mod alert_tests {
    use super::*;

    #[test]
    fn test_title_recovered_and_stripped_from_body() {
        let records = extract(
            r#"<div class="alert-box">
                 <h3>EXTREME CAUTION</h3>
                 <p>EXTREME CAUTION: Do not average down</p>
               </div>"#,
        );
        match &records[0] {
            Record::AlertNotice { title, body } => {
                assert_eq!(title, "EXTREME CAUTION");
                assert_eq!(body, "Do not average down");
            },
            other => panic!("expected alert, got {:?}", other),
        }
    }

    #[test]
    fn test_unmarked_warning_found_by_keyword() {
        let records = extract(
            r#"<div><div class="notice-strip">
                 <strong>Volatility Warning</strong>
                 <span>Expect wide intraday swings.</span>
               </div></div>"#,
        );
        assert!(matches!(records[0], Record::AlertNotice { .. }));
    }
}

mod snapshot_tests {
    use super::*;

    #[test]
    fn test_metric_rows_preserve_document_order() {
        let records = extract(
            r#"<div class="index-card">
                 <div class="metric-row"><span class="metric-label">Current Level</span>
                   <span class="metric-value">47,662</span></div>
                 <div class="metric-row"><span class="metric-label">Resistance</span>
                   <span class="metric-value">48,100</span></div>
                 <div class="metric-row"><span class="metric-label">Support</span>
                   <span class="metric-value">46,800</span></div>
               </div>"#,
        );
        match &records[0] {
            Record::IndexSnapshot { metrics } => {
                let labels: Vec<&str> = metrics.iter().map(|(l, _)| l.as_str()).collect();
                assert_eq!(labels, vec!["Current Level", "Resistance", "Support"]);
            },
            other => panic!("expected snapshot, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_list_recovered_by_keyword_anchor() {
        let records = extract(
            r#"<div><ul>
                 <li>Current Level: 47,662</li>
                 <li>Support: 46,800</li>
               </ul></div>"#,
        );
        assert!(matches!(records[0], Record::IndexSnapshot { .. }));
    }
}

mod trade_idea_tests {
    use super::*;

    #[test]
    fn test_duplicate_ticker_keeps_first_discovered() {
        // First card carries the producer's marker class; the second is only
        // reachable through the keyword fingerprint. Both say ETEL.
        let records = extract(
            r#"<body>
                 <div class="setup-card"><span class="ticker">ETEL</span>
                   <span class="company-name">Telecom Egypt</span>
                   <span class="setup-type">Accumulate</span></div>
                 <div class="box"><b>ETEL</b>
                   <p>Entry: 29.00</p><p>Target: 31.00</p><p>Stop: 27.00</p></div>
               </body>"#,
        );
        let ideas = trade_ideas(&records);
        assert_eq!(ideas.len(), 1);
        assert_eq!(ideas[0].ticker, "ETEL");
        assert_eq!(ideas[0].setup_label, "Accumulate");
    }

    #[test]
    fn test_card_without_ticker_is_dropped_silently() {
        let records = extract(
            r#"<body>
                 <div class="setup-card"><p>Entry: 1.00</p><p>Target: 2.00</p></div>
                 <div class="setup-card"><span class="ticker">SWDY</span></div>
               </body>"#,
        );
        let ideas = trade_ideas(&records);
        assert_eq!(ideas.len(), 1);
        assert_eq!(ideas[0].ticker, "SWDY");
    }

    #[test]
    fn test_freeform_card_routes_params_by_allow_list() {
        let records = extract(
            r#"<div class="idea-card">
                 <h4>HRHO - EFG Holding</h4>
                 <p>Entry: 18.20</p>
                 <p>Target: 21.00</p>
                 <p>Stop: 17.10</p>
                 <p>R:R: 2.5</p>
                 <p>Strong accumulation pattern on the weekly chart.</p>
               </div>"#,
        );
        let ideas = trade_ideas(&records);
        assert_eq!(ideas.len(), 1);
        let idea = ideas[0];
        let keys: Vec<&str> = idea.parameters.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Entry", "Target", "Stop", "R:R"]);
        assert_eq!(idea.detail_lines.len(), 1);
        assert!(idea.detail_lines[0].contains("accumulation pattern"));
    }

    #[test]
    fn test_scope_beats_setup_label() {
        // Buy-looking label inside a reduce/exit region resolves to Sell.
        let records = extract(
            r#"<div class="section"><div class="section-title">Reduce / Exit</div>
                 <div class="setup-card"><span class="ticker">COMI</span>
                   <span class="setup-type">Buy the bounce</span></div>
               </div>"#,
        );
        assert_eq!(trade_ideas(&records)[0].category, Category::Sell);
    }

    #[test]
    fn test_open_positions_scope() {
        let records = extract(
            r#"<div class="section"><div class="section-title">Open Positions</div>
                 <div class="setup-card"><span class="ticker">ABUK</span>
                   <span class="setup-type">Hold</span></div>
               </div>"#,
        );
        assert_eq!(trade_ideas(&records)[0].category, Category::Open);
    }

    #[test]
    fn test_label_only_sell_keywords() {
        for label in ["Reduce Exposure", "Exit on strength", "Distribution"] {
            let html = format!(
                r#"<div class="setup-card"><span class="ticker">ESRS</span>
                   <span class="setup-type">{}</span></div>"#,
                label
            );
            let records = extract(&html);
            assert_eq!(trade_ideas(&records)[0].category, Category::Sell, "label: {}", label);
        }
    }

    #[test]
    fn test_default_category_is_buy() {
        let records = extract(
            r#"<div class="setup-card"><span class="ticker">ETEL</span>
               <span class="setup-type">Breakout</span></div>"#,
        );
        assert_eq!(trade_ideas(&records)[0].category, Category::Buy);
    }

    #[test]
    fn test_climb_limit_is_honored() {
        // The scope title sits five containers above the card; with the
        // default limit of four the card falls back to its label.
        let html = r#"<div class="section"><div class="section-title">Open Positions</div>
              <div><div><div><div>
                <div class="setup-card"><span class="ticker">SKPC</span>
                  <span class="setup-type">Momentum</span></div>
              </div></div></div></div>
            </div>"#;
        let tree = MarkupTree::parse(html).unwrap();

        let shallow = ReportExtractor::new().extract(&tree);
        assert_eq!(trade_ideas(&shallow)[0].category, Category::Buy);

        let deep = ReportExtractor::with_config(ExtractionConfig::new().with_climb_limit(8))
            .extract(&tree);
        assert_eq!(trade_ideas(&deep)[0].category, Category::Open);
    }
}

mod watchlist_tests {
    use super::*;

    #[test]
    fn test_watchlist_entries_extracted_structurally() {
        let records = extract(
            r#"<div class="watchlist">
                 <div class="watchlist-item"><h4>ABUK - Abu Qir</h4>
                   <p>Trigger: break of 52.0</p>
                   <p>Watching volume confirmation.</p></div>
                 <div class="watchlist-item"><h4>ORAS - Orascom</h4>
                   <p>Current: 240.0</p></div>
               </div>"#,
        );
        let entries: Vec<_> = records
            .iter()
            .filter(|r| matches!(r, Record::WatchlistEntry(_)))
            .collect();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_title_scoped_watchlist_region_excluded_from_trade_ideas() {
        let records = extract(
            r#"<div class="section"><div class="section-title">Watchlist</div>
                 <div class="setup-card"><span class="ticker">ORAS</span>
                   <p>Entry: 240.0</p></div>
               </div>"#,
        );
        assert!(trade_ideas(&records).is_empty());
    }

    #[test]
    fn test_watchlist_cards_never_become_trade_ideas() {
        let records = extract(
            r#"<div class="watchlist">
                 <div class="watchlist-item idea-card"><h4>ABUK</h4>
                   <p>Entry: 50.0</p><p>Target: 55.0</p><p>Stop: 48.0</p></div>
               </div>"#,
        );
        assert!(trade_ideas(&records).is_empty());
    }
}

mod determinism_tests {
    use super::*;

    #[test]
    fn test_extraction_is_deterministic() {
        let html = r#"<body>
            <div class="alert-box"><h3>CAUTION</h3><p>Thin liquidity.</p></div>
            <div class="setup-card"><span class="ticker">COMI</span>
              <span class="setup-type">Accumulate</span></div>
            <div class="market-notes"><ul><li>Breadth improving</li></ul></div>
          </body>"#;
        let tree = MarkupTree::parse(html).unwrap();
        let extractor = ReportExtractor::new();
        assert_eq!(extractor.extract(&tree), extractor.extract(&tree));
    }
}
