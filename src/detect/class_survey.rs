//! Class-intersection survey scoring.
//!
//! Legacy transcripts carry inconsistent class naming: the same hadith
//! block may be `inserted-hadees` in one session and `ahadees-content` in
//! another. The survey trades per-instance addressability for robustness. It
//! scans opening tags with a regex, intersects class tokens
//! case-insensitively against each group's target set, and consolidates all
//! hits for a group into a single scored record. Output feeds cataloging and
//! statistics, never the injection path.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::catalog::AssetClassGroup;

/// Matches opening tags carrying a class attribute. Captures: (1) tag name,
/// (2) the class attribute value.
static CLASS_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<(\w+)[^>]*\s+class\s*=\s*["']([^"']*)["'][^>]*>"#)
        .expect("CLASS_ATTR_RE: hardcoded regex is valid")
});

/// One consolidated record per class group per transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetClassSummary {
    /// Primary class naming the group
    pub asset_class: String,
    /// Union of non-primary classes seen on the first hit, sorted and
    /// comma-joined; `None` when the hit carried only the primary class
    pub alternate_classes: Option<String>,
    /// Total hits for the group in this transcript
    pub instance_count: usize,
    /// Confidence in `[1, 5]`: `ceil(|intersection| / |targets| * 5)`,
    /// floored at 1
    pub class_score: u8,
    /// Sequential position among groups that hit, 1-based
    pub position: usize,
    /// Flexible selector usable to re-find members of the group
    pub css_pattern: String,
}

/// Survey `html` for each class group, producing one consolidated summary
/// per group that hits. Groups with no hits are omitted.
pub fn survey_asset_classes(html: &str, groups: &[AssetClassGroup]) -> Vec<AssetClassSummary> {
    if html.is_empty() {
        return Vec::new();
    }

    let mut summaries = Vec::new();
    let mut position = 1;

    for group in groups {
        let hits = find_elements_with_class_intersection(html, &group.classes);
        if hits.is_empty() {
            continue;
        }

        let first_classes = &hits[0];
        let class_score = class_score(first_classes, &group.classes);
        let mut alternates: Vec<&str> = first_classes
            .iter()
            .map(String::as_str)
            .filter(|c| *c != group.primary_class)
            .collect();
        alternates.sort_unstable();

        log::debug!(
            "class survey: {} hits for '{}' (score {}, alternates: {})",
            hits.len(),
            group.primary_class,
            class_score,
            if alternates.is_empty() { "none".to_string() } else { alternates.join(",") },
        );

        summaries.push(AssetClassSummary {
            asset_class: group.primary_class.clone(),
            alternate_classes: if alternates.is_empty() {
                None
            } else {
                Some(alternates.join(","))
            },
            instance_count: hits.len(),
            class_score,
            position,
            css_pattern: format!("[class*='{}']", group.primary_class),
        });
        position += 1;
    }

    summaries
}

/// Class-token lists of every element whose classes intersect the target
/// set (case-insensitive).
fn find_elements_with_class_intersection(html: &str, target_classes: &[String]) -> Vec<Vec<String>> {
    let mut elements = Vec::new();
    for caps in CLASS_ATTR_RE.captures_iter(html) {
        let tokens: Vec<String> = caps[2]
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let intersects = target_classes.iter().any(|target| {
            tokens.iter().any(|token| token.eq_ignore_ascii_case(target))
        });
        if intersects {
            elements.push(tokens);
        }
    }
    elements
}

/// Score in `[1, 5]` from the share of target classes present on the element.
fn class_score(element_classes: &[String], target_classes: &[String]) -> u8 {
    let intersection = target_classes
        .iter()
        .filter(|target| {
            element_classes
                .iter()
                .any(|token| token.eq_ignore_ascii_case(target))
        })
        .count();
    let ratio = intersection as f64 / target_classes.len() as f64;
    ((ratio * 5.0).ceil() as u8).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::default_class_groups;

    #[test]
    fn consolidates_hits_into_one_record_per_group() {
        let html = r#"
            <div class="ayah-card">one</div>
            <div class="ayah-card highlighted">two</div>
            <p class="unrelated">x</p>
        "#;
        let groups = vec![AssetClassGroup::new("ayah-card", &["ayah-card"])];
        let summaries = survey_asset_classes(html, &groups);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].instance_count, 2);
        assert_eq!(summaries[0].css_pattern, "[class*='ayah-card']");
        assert_eq!(summaries[0].position, 1);
    }

    #[test]
    fn full_intersection_scores_five_partial_scores_lower() {
        let html = r#"<img class="imgResponsive" src="a.png">"#;
        let groups = vec![AssetClassGroup::new(
            "imgResponsive",
            &["imgResponsive", "fr-fic", "fr-dib", "fr-bordered"],
        )];
        let partial = survey_asset_classes(html, &groups);
        // 1 of 4 targets present: ceil(0.25 * 5) = 2
        assert_eq!(partial[0].class_score, 2);

        let html = r#"<img class="imgResponsive fr-fic fr-dib fr-bordered" src="a.png">"#;
        let full = survey_asset_classes(html, &groups);
        assert_eq!(full[0].class_score, 5);
    }

    #[test]
    fn score_never_drops_below_one_and_matches_case_insensitively() {
        let html = r#"<div class="AYAH-CARD">v</div>"#;
        let groups = vec![AssetClassGroup::new("ayah-card", &["ayah-card"])];
        let summaries = survey_asset_classes(html, &groups);
        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].class_score >= 1);
    }

    #[test]
    fn alternates_exclude_the_primary_and_are_sorted() {
        let html = r#"<div class="inserted-hadees zz-style ahadees-content">h</div>"#;
        let groups = vec![AssetClassGroup::new(
            "inserted-hadees",
            &["inserted-hadees", "ahadees-content"],
        )];
        let summaries = survey_asset_classes(html, &groups);
        assert_eq!(
            summaries[0].alternate_classes.as_deref(),
            Some("ahadees-content,zz-style")
        );
    }

    #[test]
    fn groups_without_hits_are_omitted() {
        let html = r#"<div class="ayah-card">v</div>"#;
        let summaries = survey_asset_classes(html, &default_class_groups());
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].asset_class, "ayah-card");
    }

    #[test]
    fn empty_html_yields_empty_survey() {
        assert!(survey_asset_classes("", &default_class_groups()).is_empty());
    }
}
