//! Quick shareability checks for the host control panel.
//!
//! These answer "does this transcript contain anything worth sharing"
//! without running the full transform: a boolean gate for enabling the
//! share UI, and a per-type count report for the detection summary line.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::catalog::{AssetTypeDefinition, DetectionStrategy};

/// True when any selector-strategy catalog entry matches at least one
/// element. Unsuitable input (blank HTML) is simply not shareable.
pub fn has_shareable_assets(html: &str, catalog: &[AssetTypeDefinition]) -> bool {
    if html.trim().is_empty() {
        return false;
    }
    let document = Html::parse_fragment(html);
    catalog
        .iter()
        .filter(|def| def.strategy == DetectionStrategy::Selector)
        .any(|def| match Selector::parse(&def.css_selector) {
            Ok(selector) => document.select(&selector).next().is_some(),
            Err(_) => false,
        })
}

/// Match count for one asset type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTypeCount {
    pub display_name: String,
    pub count: usize,
}

/// Per-type shareable asset counts for one session transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSurveyReport {
    pub session_id: i64,
    pub total_assets: usize,
    pub counts: Vec<AssetTypeCount>,
}

impl AssetSurveyReport {
    /// Human summary in the host panel's wording.
    pub fn summary_line(&self) -> String {
        if self.total_assets == 0 {
            return format!("No sharable assets found in session {}", self.session_id);
        }
        let parts: Vec<String> = self
            .counts
            .iter()
            .map(|c| format!("{}: {}", c.display_name, c.count))
            .collect();
        format!(
            "Found {} sharable assets in session {}: {}",
            self.total_assets,
            self.session_id,
            parts.join(", ")
        )
    }
}

/// Count matches per selector-strategy catalog entry. Types with zero
/// matches are omitted from the report.
pub fn summarize_shareable_assets(
    html: &str,
    catalog: &[AssetTypeDefinition],
    session_id: i64,
) -> AssetSurveyReport {
    let mut counts = Vec::new();
    let mut total = 0;

    if !html.trim().is_empty() {
        let document = Html::parse_fragment(html);
        for def in catalog {
            if def.strategy != DetectionStrategy::Selector {
                continue;
            }
            let Ok(selector) = Selector::parse(&def.css_selector) else {
                tracing::warn!(
                    asset_type = %def.identifier,
                    selector = %def.css_selector,
                    "invalid catalog selector in survey"
                );
                continue;
            };
            let count = document.select(&selector).count();
            if count > 0 {
                tracing::debug!(
                    asset_type = %def.identifier,
                    count,
                    "shareable assets found"
                );
                total += count;
                counts.push(AssetTypeCount {
                    display_name: def.display_name.clone(),
                    count,
                });
            }
        }
    }

    AssetSurveyReport {
        session_id,
        total_assets: total,
        counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin_definitions;

    #[test]
    fn blank_transcript_is_not_shareable() {
        assert!(!has_shareable_assets("", &builtin_definitions()));
        assert!(!has_shareable_assets("  \n ", &builtin_definitions()));
    }

    #[test]
    fn transcript_with_assets_is_shareable() {
        let html = r#"<div class="ayah-card">v</div>"#;
        assert!(has_shareable_assets(html, &builtin_definitions()));
        assert!(!has_shareable_assets("<p>plain prose</p>", &builtin_definitions()));
    }

    #[test]
    fn report_counts_per_type_and_formats_summary() {
        let html = r#"
            <div class="ayah-card">a</div>
            <div class="ayah-card">b</div>
            <img src="x.png">
        "#;
        let report = summarize_shareable_assets(html, &builtin_definitions(), 212);
        assert_eq!(report.total_assets, 3);
        assert_eq!(report.counts.len(), 2);
        let line = report.summary_line();
        assert!(line.starts_with("Found 3 sharable assets in session 212:"));
        assert!(line.contains("Quranic Verse: 2"));
        assert!(line.contains("Image Asset: 1"));
    }

    #[test]
    fn empty_report_says_so() {
        let report = summarize_shareable_assets("<p>x</p>", &builtin_definitions(), 7);
        assert_eq!(report.total_assets, 0);
        assert_eq!(report.summary_line(), "No sharable assets found in session 7");
    }
}
