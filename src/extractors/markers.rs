// src/extractors/markers.rs

// --- Imports ---
use std::fmt;

use crate::sources::RawDocument;
use crate::utils::error::ExtractError;

// --- Data Structures ---

/// Where the value sits inside a document: after `open`, before the next `close`,
/// and after the last `>` in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionSpec {
    pub name: &'static str,
    pub open: &'static str,
    pub close: &'static str,
}

/// The published nisab amount, currency symbol and first thousands separator stripped.
/// Kept as text; nothing downstream treats it as a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NisabValue(String);

impl NisabValue {
    pub fn new(value: impl Into<String>) -> Self {
        NisabValue(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NisabValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// --- Extraction ---

/// Pulls the value out of `document` using the marker pair in `spec`.
/// An empty match is an error, so the next strategy gets a chance.
pub fn extract(document: &RawDocument, spec: &ExtractionSpec) -> Result<NisabValue, ExtractError> {
    let strategy = document.strategy;
    let text = document.body.as_str();

    let (_, after_open) = text.split_once(spec.open).ok_or_else(|| {
        ExtractError::format_changed(
            strategy,
            format!("opening marker `{}` ({}) not found in {} bytes", spec.open, spec.name, text.len()),
        )
    })?;

    let (span, _) = after_open.split_once(spec.close).ok_or_else(|| {
        ExtractError::format_changed(
            strategy,
            format!("closing marker `{}` ({}) not found after opening marker", spec.close, spec.name),
        )
    })?;

    // rsplit always yields at least one item, even for an empty span.
    let last_token = span.rsplit('>').next().unwrap_or_default();
    tracing::debug!("[{}] {} span ends with token '{}'", strategy, spec.name, last_token);

    if last_token.trim().is_empty() {
        return Err(ExtractError::format_changed(
            strategy,
            format!("{} matched but holds no text", spec.name),
        ));
    }

    Ok(normalize(last_token))
}

/// Drops every `$` and the first `,` only.
///
/// `$1,234,567` becomes `1234,567`. Values under a million are unaffected.
pub fn normalize(raw: &str) -> NisabValue {
    NisabValue::new(raw.replace('$', "").replacen(',', "", 1))
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::StrategyKind;

    fn extract_for(strategy: StrategyKind, body: &str, spec: &ExtractionSpec) -> Result<NisabValue, ExtractError> {
        extract(&RawDocument::new(strategy, body), spec)
    }

    const HEADING: ExtractionSpec = ExtractionSpec {
        name: "page heading",
        open: "<h2",
        close: "</h2>",
    };

    #[test]
    fn test_extracts_text_from_nested_heading() {
        let html = r#"<html><body><h1>Nisab</h1><h2 class="elementor-heading-title"><span>$5,200.50</span></h2><p>Updated</p></body></html>"#;
        let value = extract_for(StrategyKind::Direct, html, &HEADING).unwrap();
        assert_eq!(value.as_str(), "5200.50");
    }

    #[test]
    fn test_only_first_comma_is_removed() {
        let html = "<h2><b>$1,234,567</b></h2>";
        let value = extract_for(StrategyKind::Direct, html, &HEADING).unwrap();
        assert_eq!(value.as_str(), "1234,567");
    }

    #[test]
    fn test_uses_first_heading_only() {
        let html = "<h2>$7,500</h2><h2>$9,999</h2>";
        let value = extract_for(StrategyKind::Direct, html, &HEADING).unwrap();
        assert_eq!(value.as_str(), "7500");
    }

    #[test]
    fn test_missing_opening_marker_is_format_changed() {
        let html = "<html><body><h3>$7,500</h3></body></html>";
        let err = extract_for(StrategyKind::SearchEngine, html, &HEADING).unwrap_err();
        match err {
            ExtractError::FormatChanged { strategy, reason, raw_cause } => {
                assert_eq!(strategy, StrategyKind::SearchEngine);
                assert_eq!(reason, "format changed");
                assert!(raw_cause.contains("<h2"), "cause should name the marker: {}", raw_cause);
            }
        }
    }

    #[test]
    fn test_missing_closing_marker_is_format_changed() {
        let html = "<h2><span>$7,500</span>";
        let err = extract_for(StrategyKind::Direct, html, &HEADING).unwrap_err();
        assert_eq!(err.strategy(), StrategyKind::Direct);
    }

    #[test]
    fn test_empty_document_does_not_panic() {
        assert!(extract_for(StrategyKind::Direct, "", &HEADING).is_err());
    }

    #[test]
    fn test_empty_last_token_is_format_changed() {
        for html in ["<h2></h2>", "<h2><span>$5,200</span>\n  </h2>", "<h2 class=\"title\">   </h2>"] {
            let err = extract_for(StrategyKind::Direct, html, &HEADING).unwrap_err();
            assert_eq!(err.strategy(), StrategyKind::Direct, "{}", html);
        }
    }

    #[test]
    fn test_span_without_tags_is_taken_whole() {
        let spec = ExtractionSpec {
            name: "snippet",
            open: "Nisab: ",
            close: " as of",
        };
        let value = extract_for(StrategyKind::SearchEngine, "Nisab: $8,010 as of today", &spec).unwrap();
        assert_eq!(value.as_str(), "8010");
    }

    #[test]
    fn test_normalize_strips_all_dollar_signs() {
        assert_eq!(normalize("$$12,000").as_str(), "12000");
        assert_eq!(normalize("  7500 ").as_str(), "  7500 ");
    }
}
