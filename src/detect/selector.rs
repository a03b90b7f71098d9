//! Selector-driven per-instance detection.

use chrono::Utc;
use kuchiki::NodeRef;
use kuchiki::traits::TendrilSink;
use regex::Regex;

use crate::catalog::{AssetTypeDefinition, DetectionStrategy};

use super::types::{DetectedAsset, DetectedInstance};

/// Detect all asset instances in a parsed transcript document.
///
/// Catalog entries are processed in ascending priority order (ties broken by
/// catalog order); within one entry, instances are numbered 1-based in
/// document order. An element matched by one entry stays eligible for later
/// entries whose selectors also hit it: there is no claim mechanism across
/// asset types, and overlaps resolve purely by processing order.
///
/// Class-intersection entries belong to the survey path and are skipped
/// here; regex-pattern entries yield handle-less instances the injector will
/// pass over.
pub fn detect_assets(
    document: &NodeRef,
    catalog: &[AssetTypeDefinition],
    session_id: i64,
) -> Vec<DetectedInstance> {
    let mut ordered: Vec<&AssetTypeDefinition> = catalog.iter().collect();
    ordered.sort_by_key(|def| def.priority);

    let mut detected = Vec::new();
    for def in ordered {
        match &def.strategy {
            DetectionStrategy::Selector => {
                detect_by_selector(document, def, session_id, &mut detected);
            }
            DetectionStrategy::RegexPattern { pattern } => {
                detect_by_regex(document, def, pattern, session_id, &mut detected);
            }
            DetectionStrategy::ClassIntersection { .. } => {
                tracing::debug!(
                    asset_type = %def.identifier,
                    "class-intersection entry skipped on the per-instance path"
                );
            }
        }
    }
    detected
}

/// Convenience wrapper: parse `html` and return detection records only.
///
/// Empty input short-circuits to an empty sequence without a parse attempt.
pub fn detect_assets_in_html(
    html: &str,
    catalog: &[AssetTypeDefinition],
    session_id: i64,
) -> Vec<DetectedAsset> {
    if html.trim().is_empty() {
        return Vec::new();
    }
    let document = kuchiki::parse_html().one(html.to_string());
    detect_assets(&document, catalog, session_id)
        .into_iter()
        .map(|instance| instance.record)
        .collect()
}

fn detect_by_selector(
    document: &NodeRef,
    def: &AssetTypeDefinition,
    session_id: i64,
    detected: &mut Vec<DetectedInstance>,
) {
    let matches = match document.select(&def.css_selector) {
        Ok(iter) => iter.collect::<Vec<_>>(),
        Err(()) => {
            tracing::warn!(
                asset_type = %def.identifier,
                selector = %def.css_selector,
                "invalid catalog selector, skipping asset type"
            );
            return;
        }
    };

    if matches.is_empty() {
        tracing::debug!(
            asset_type = %def.identifier,
            selector = %def.css_selector,
            "no matches for asset type"
        );
        return;
    }

    for (i, element) in matches.into_iter().enumerate() {
        let instance_number = i as u32 + 1;
        let node = element.as_node().clone();
        detected.push(DetectedInstance {
            record: DetectedAsset {
                asset_id: format_asset_id(session_id, &def.identifier, instance_number),
                asset_type: def.identifier.clone(),
                display_name: def.display_name.clone(),
                instance_number,
                dom_position: element_sibling_index(&node),
                fragment_hint: None,
                detected_at: Utc::now(),
            },
            element: Some(node),
        });
    }
}

fn detect_by_regex(
    document: &NodeRef,
    def: &AssetTypeDefinition,
    pattern: &str,
    session_id: i64,
    detected: &mut Vec<DetectedInstance>,
) {
    let regex = match Regex::new(pattern) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(
                asset_type = %def.identifier,
                error = %e,
                "invalid catalog regex pattern, skipping asset type"
            );
            return;
        }
    };

    let html = serialize_node(document);
    for (i, m) in regex.find_iter(&html).enumerate() {
        let instance_number = i as u32 + 1;
        let hint: String = m.as_str().chars().take(120).collect();
        detected.push(DetectedInstance {
            record: DetectedAsset {
                asset_id: format_asset_id(session_id, &def.identifier, instance_number),
                asset_type: def.identifier.clone(),
                display_name: def.display_name.clone(),
                instance_number,
                dom_position: 0,
                fragment_hint: Some(hint),
                detected_at: Utc::now(),
            },
            element: None,
        });
    }
}

fn format_asset_id(session_id: i64, identifier: &str, instance_number: u32) -> String {
    format!("{session_id}-{identifier}-{instance_number}")
}

/// Recover `(session_id, asset_type, instance_number)` from an asset id.
///
/// The id scheme is `{session}-{type}-{n}` where the type itself may contain
/// dashes, so the session is the leading integer segment and the instance is
/// the trailing one.
pub fn parse_asset_id(asset_id: &str) -> Option<(i64, String, u32)> {
    let (session_part, rest) = asset_id.split_once('-')?;
    let (type_part, instance_part) = rest.rsplit_once('-')?;
    if type_part.is_empty() {
        return None;
    }
    let session_id = session_part.parse::<i64>().ok()?;
    let instance_number = instance_part.parse::<u32>().ok()?;
    Some((session_id, type_part.to_string(), instance_number))
}

/// Index of `node` among its parent's element children, text and comment
/// siblings excluded. Injection order relies on this: inserting a button
/// before an element shifts the indices of every later sibling, so the
/// injector walks positions in descending order.
pub(crate) fn element_sibling_index(node: &NodeRef) -> usize {
    let Some(parent) = node.parent() else {
        return 0;
    };
    let mut index = 0;
    for sibling in parent.children() {
        if sibling == *node {
            break;
        }
        if sibling.as_element().is_some() {
            index += 1;
        }
    }
    index
}

pub(crate) fn serialize_node(node: &NodeRef) -> String {
    let mut buf = Vec::new();
    if let Err(e) = node.serialize(&mut buf) {
        tracing::warn!(error = %e, "HTML serialization failed");
        return String::new();
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::source::builtin_definitions;

    fn builtin_catalog() -> Vec<AssetTypeDefinition> {
        builtin_definitions()
    }

    #[test]
    fn detects_instances_in_document_order_with_deterministic_ids() {
        let html = r#"<div class="ayah-card">first</div><p>x</p><div class="ayah-card">second</div>"#;
        let catalog = vec![AssetTypeDefinition::selector(
            "ayah-card",
            "Quranic Verse",
            ".ayah-card",
            1,
        )];

        let first = detect_assets_in_html(html, &catalog, 42);
        let second = detect_assets_in_html(html, &catalog, 42);

        let ids: Vec<&str> = first.iter().map(|a| a.asset_id.as_str()).collect();
        assert_eq!(ids, ["42-ayah-card-1", "42-ayah-card-2"]);
        assert_eq!(
            first.iter().map(|a| &a.asset_id).collect::<Vec<_>>(),
            second.iter().map(|a| &a.asset_id).collect::<Vec<_>>(),
        );
        assert_eq!(first[0].instance_number, 1);
        assert_eq!(first[1].instance_number, 2);
    }

    #[test]
    fn catalog_priority_orders_across_types() {
        let html = r#"<img src="a.png"><div class="ayah-card">v</div>"#;
        let assets = detect_assets_in_html(html, &builtin_catalog(), 7);
        // image-asset has priority 3 and must come after the priority-1 card.
        let types: Vec<&str> = assets.iter().map(|a| a.asset_type.as_str()).collect();
        let card_pos = types.iter().position(|t| *t == "ayah-card").unwrap();
        let img_pos = types.iter().position(|t| *t == "image-asset").unwrap();
        assert!(card_pos < img_pos);
    }

    #[test]
    fn one_element_can_match_two_catalog_entries() {
        // No claim mechanism across types: a table carrying an ahadees class
        // is matched by both entries and gets two records.
        let html = r#"<table class="islamic-table ahadees-content"><tr><td>x</td></tr></table>"#;
        let catalog = vec![
            AssetTypeDefinition::selector("ahadees-content", "Hadith Content", "[class*='ahadees']", 1),
            AssetTypeDefinition::selector("islamic-table", "Islamic Table", ".islamic-table", 2),
        ];
        let assets = detect_assets_in_html(html, &catalog, 5);
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].asset_id, "5-ahadees-content-1");
        assert_eq!(assets[1].asset_id, "5-islamic-table-1");
    }

    #[test]
    fn empty_html_returns_no_assets_without_parsing() {
        assert!(detect_assets_in_html("", &builtin_catalog(), 1).is_empty());
        assert!(detect_assets_in_html("   ", &builtin_catalog(), 1).is_empty());
    }

    #[test]
    fn invalid_selector_skips_type_without_failing() {
        let html = r#"<div class="ayah-card">v</div>"#;
        let catalog = vec![
            AssetTypeDefinition::selector("broken", "Broken", ":::nonsense", 1),
            AssetTypeDefinition::selector("ayah-card", "Quranic Verse", ".ayah-card", 2),
        ];
        let assets = detect_assets_in_html(html, &catalog, 3);
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].asset_type, "ayah-card");
    }

    #[test]
    fn regex_strategy_yields_handleless_instances() {
        let html = r#"<span class="inlineArabic">بسم الله</span>"#;
        let catalog = vec![AssetTypeDefinition {
            identifier: "inline-arabic".into(),
            display_name: "Arabic Text".into(),
            css_selector: String::new(),
            priority: 1,
            strategy: DetectionStrategy::RegexPattern {
                pattern: r#"<span class="inlineArabic">[^<]*</span>"#.into(),
            },
        }];
        let document = kuchiki::parse_html().one(html.to_string());
        let instances = detect_assets(&document, &catalog, 9);
        assert_eq!(instances.len(), 1);
        assert!(instances[0].element.is_none());
        assert!(instances[0].record.fragment_hint.as_deref().unwrap().contains("inlineArabic"));
    }

    #[test]
    fn sibling_index_counts_only_elements() {
        let html = r#"<div>text<p>a</p>more<div class="ayah-card">v</div></div>"#;
        let assets = detect_assets_in_html(
            html,
            &[AssetTypeDefinition::selector("ayah-card", "Quranic Verse", ".ayah-card", 1)],
            1,
        );
        assert_eq!(assets[0].dom_position, 1);
    }

    #[test]
    fn asset_id_round_trips_through_parse() {
        assert_eq!(
            parse_asset_id("42-ayah-card-1"),
            Some((42, "ayah-card".to_string(), 1))
        );
        assert_eq!(
            parse_asset_id("99-ahadees-content-12"),
            Some((99, "ahadees-content".to_string(), 12))
        );
        assert_eq!(parse_asset_id("not-an-id"), None);
        assert_eq!(parse_asset_id("42"), None);
    }
}
