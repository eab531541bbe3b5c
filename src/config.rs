//! Configuration for extraction and rendering.

/// Tuning knobs for the extraction strategy cascades.
///
/// The producer's markup shape drifts between versions, so the heuristics
/// that bridge the gap are bounded by configuration rather than constants.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Maximum number of ancestor levels a keyword-anchor strategy climbs
    /// when looking for the enclosing record container.
    pub climb_limit: usize,

    /// Maximum flattened-text length (in characters) a fingerprint match may
    /// have. Containers above this are rejected as too coarse to be a single
    /// record.
    pub fingerprint_max_text: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self {
            climb_limit: 4,
            fingerprint_max_text: 1200,
        }
    }

    /// Set the ancestor climb limit.
    pub fn with_climb_limit(mut self, limit: usize) -> Self {
        self.climb_limit = limit;
        self
    }

    /// Set the fingerprint container size cutoff.
    pub fn with_fingerprint_max_text(mut self, max: usize) -> Self {
        self.fingerprint_max_text = max;
        self
    }
}

/// Configuration for the generated document.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Document title shown in the banner band on every page.
    pub banner_title: String,
    /// Subtitle line under the banner title.
    pub banner_subtitle: String,
    /// Third banner line (generation stamp, index level, etc.).
    pub banner_stamp: String,
    /// Footer label, rendered as "{label} | Page N".
    pub footer_label: String,
    /// Whether to compress page content streams with FlateDecode.
    pub compress: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            banner_title: "Market Intelligence Report".to_string(),
            banner_subtitle: "Technical Analysis | For Informational Purposes Only".to_string(),
            banner_stamp: String::new(),
            footer_label: "Market Report".to_string(),
            compress: false,
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the banner title.
    pub fn with_banner_title(mut self, title: impl Into<String>) -> Self {
        self.banner_title = title.into();
        self
    }

    /// Set the banner subtitle.
    pub fn with_banner_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.banner_subtitle = subtitle.into();
        self
    }

    /// Set the banner stamp line.
    pub fn with_banner_stamp(mut self, stamp: impl Into<String>) -> Self {
        self.banner_stamp = stamp.into();
        self
    }

    /// Set the footer label.
    pub fn with_footer_label(mut self, label: impl Into<String>) -> Self {
        self.footer_label = label.into();
        self
    }

    /// Enable or disable content stream compression.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}
