//! Cell and line text normalization.
//!
//! Table cells extracted from filings carry non-breaking spaces, stray markup
//! characters, dot leaders and ragged whitespace. The cleaner reduces them to
//! a single-spaced, trimmed string. Cleaning is idempotent: cleaning an
//! already-cleaned string returns it unchanged.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static NOISE_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[^A-Za-z0-9,()$.%"'/:;=\s]+"#).expect("noise character pattern is valid")
});

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Options controlling which cleanup steps run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupOptions {
    /// Normalize Unicode to NFKC form (maps NBSP and friends to plain spaces)
    pub normalize_unicode: bool,

    /// Remove characters outside the financial-text alphabet
    pub remove_noise_chars: bool,

    /// Remove `..` dot leaders used to pad account labels in text tables
    pub remove_dot_leaders: bool,
}

impl CleanupOptions {
    /// Options for cells of HTML tables.
    pub fn html_cells() -> Self {
        Self {
            normalize_unicode: true,
            remove_noise_chars: true,
            remove_dot_leaders: false,
        }
    }

    /// Options for column slices of fixed-width text tables.
    pub fn text_cells() -> Self {
        Self {
            remove_dot_leaders: true,
            ..Self::html_cells()
        }
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::html_cells()
    }
}

/// Normalizes extracted cell and line text.
#[derive(Debug, Clone, Default)]
pub struct CellCleaner {
    options: CleanupOptions,
}

impl CellCleaner {
    /// Create a cleaner with the given options.
    pub fn new(options: CleanupOptions) -> Self {
        Self { options }
    }

    /// Cleaner for HTML table cells.
    pub fn html() -> Self {
        Self::new(CleanupOptions::html_cells())
    }

    /// Cleaner for fixed-width text table slices.
    pub fn text() -> Self {
        Self::new(CleanupOptions::text_cells())
    }

    /// Get the active options.
    pub fn options(&self) -> &CleanupOptions {
        &self.options
    }

    /// Clean a piece of text.
    pub fn clean(&self, text: &str) -> String {
        let mut result: String = if self.options.normalize_unicode {
            text.nfkc().collect()
        } else {
            text.replace('\u{a0}', " ")
        };

        if self.options.remove_noise_chars {
            result = NOISE_CHARS.replace_all(&result, "").into_owned();
        }

        // Non-overlapping removal leaves at most one dot per run, so a
        // second pass never finds a new pair.
        if self.options.remove_dot_leaders {
            result = result.replace("..", "");
        }

        WHITESPACE_RUN.replace_all(&result, " ").trim().to_string()
    }
}

/// Clean text with the HTML cell options.
pub fn clean_cell(text: &str) -> String {
    CellCleaner::html().clean(text)
}
