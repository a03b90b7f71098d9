//! Fragment extraction: re-finding one asset in the original transcript.
//!
//! Extraction always re-parses the *original* (pre-injection) HTML so the
//! payload delivered to participants can never carry injected share-button
//! markup. The element is located by its `data-asset-id` stamp when the
//! stored HTML has one, and otherwise by re-running detection: the id scheme
//! mints identically on every pass over the same HTML.

use chrono::{DateTime, Utc};
use kuchiki::NodeRef;
use kuchiki::traits::TendrilSink;
use serde::{Deserialize, Serialize};

use crate::catalog::AssetTypeDefinition;
use crate::detect::selector::serialize_node;
use crate::detect::{detect_assets, parse_asset_id};
use crate::errors::{PipelineError, PipelineResult};

/// Maximum length of the text preview carried in fragment metadata.
const PREVIEW_CHARS: usize = 200;

/// Best-effort structural metadata for an extracted fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentMetadata {
    pub tag_name: String,
    pub css_class: Option<String>,
    pub id: Option<String>,
    /// Image source, when the fragment is an `<img>`
    pub src: Option<String>,
    /// Image alt text, when the fragment is an `<img>`
    pub alt: Option<String>,
    /// Row count, when the fragment is a `<table>`
    pub row_count: Option<usize>,
    /// Cell count (`td` + `th`), when the fragment is a `<table>`
    pub cell_count: Option<usize>,
    pub text_preview: String,
}

/// One extracted asset fragment, ready for broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFragment {
    pub asset_id: String,
    pub asset_type: String,
    /// Outer HTML of the asset element, free of injected controls
    pub html: String,
    /// Trimmed inner text
    pub text_content: String,
    pub metadata: FragmentMetadata,
    pub extracted_at: DateTime<Utc>,
}

/// Extract the fragment identified by `asset_id` from `original_html`.
///
/// Not-found is `Ok(None)`; only a malformed asset id is an error.
pub fn extract_fragment(
    original_html: &str,
    asset_id: &str,
    catalog: &[AssetTypeDefinition],
) -> PipelineResult<Option<ExtractedFragment>> {
    if original_html.is_empty() || asset_id.is_empty() {
        return Ok(None);
    }
    if asset_id.contains('"') || asset_id.contains('\'') {
        return Err(PipelineError::AssetId(asset_id.to_string()));
    }

    let document = kuchiki::parse_html().one(original_html.to_string());

    // Stored HTML that went through a transform already carries the stamp.
    // Share buttons echo the asset id too, so skip anything that is itself
    // a share control.
    let stamped = document
        .select(&format!("[data-asset-id=\"{asset_id}\"]"))
        .ok()
        .and_then(|mut iter| {
            iter.find(|el| {
                let attrs = el.attributes.borrow();
                !attrs.contains("data-share-button") && !attrs.contains("data-share-id")
            })
        });
    if let Some(element) = stamped {
        let node = element.as_node().clone();
        let asset_type = element
            .attributes
            .borrow()
            .get("data-asset-type")
            .unwrap_or("unknown")
            .to_string();
        tracing::debug!(asset_id, %asset_type, "fragment located by stamped attribute");
        return Ok(Some(build_fragment(&node, asset_id, &asset_type)));
    }

    // Original transcripts carry no stamps: re-run detection and match on
    // the deterministic id.
    let Some((session_id, _, _)) = parse_asset_id(asset_id) else {
        tracing::warn!(asset_id, "asset id not found and not re-derivable");
        return Ok(None);
    };
    for instance in detect_assets(&document, catalog, session_id) {
        if instance.record.asset_id == asset_id {
            if let Some(node) = instance.element {
                tracing::debug!(asset_id, "fragment re-located by deterministic detection");
                return Ok(Some(build_fragment(
                    &node,
                    asset_id,
                    &instance.record.asset_type,
                )));
            }
        }
    }

    tracing::warn!(asset_id, "asset element not found");
    Ok(None)
}

/// Legacy raw extraction: the Nth element matching a hard-coded selector for
/// the asset type. Back-compat path for ayah-card/ahadees shares predating
/// stable asset ids; no catalog, no class scoring.
pub fn extract_raw_by_instance(
    transcript: &str,
    asset_type: &str,
    instance_number: u32,
) -> Option<String> {
    if transcript.is_empty() || instance_number == 0 {
        return None;
    }

    let selector = match asset_type {
        "ayah-card" => "div[class*='ayah-card']",
        "ahadees-content" | "inserted-hadees" => "[class*='ahadees'], [class*='inserted-hadees']",
        _ => {
            tracing::warn!(asset_type, "no raw-extraction selector for asset type");
            return None;
        }
    };

    let document = kuchiki::parse_html().one(transcript.to_string());
    let element = document
        .select(selector)
        .ok()?
        .nth(instance_number as usize - 1)?;
    let html = serialize_node(element.as_node());
    tracing::debug!(
        asset_type,
        instance_number,
        length = html.len(),
        "raw asset fragment extracted"
    );
    Some(html)
}

fn build_fragment(node: &NodeRef, asset_id: &str, asset_type: &str) -> ExtractedFragment {
    let text = node.text_contents().trim().to_string();
    ExtractedFragment {
        asset_id: asset_id.to_string(),
        asset_type: asset_type.to_string(),
        html: serialize_node(node),
        metadata: element_metadata(node, &text),
        text_content: text,
        extracted_at: Utc::now(),
    }
}

fn element_metadata(node: &NodeRef, text: &str) -> FragmentMetadata {
    let mut metadata = FragmentMetadata {
        text_preview: text.chars().take(PREVIEW_CHARS).collect(),
        ..FragmentMetadata::default()
    };

    let Some(data) = node.as_element() else {
        return metadata;
    };
    let tag_name = data.name.local.to_string();
    let attrs = data.attributes.borrow();
    metadata.tag_name = tag_name.clone();
    metadata.css_class = attrs.get("class").map(str::to_string);
    metadata.id = attrs.get("id").map(str::to_string);

    if tag_name == "img" {
        metadata.src = attrs.get("src").map(str::to_string);
        metadata.alt = attrs.get("alt").map(str::to_string);
    }
    if tag_name == "table" {
        metadata.row_count = node.select("tr").map(|iter| iter.count()).ok();
        metadata.cell_count = node.select("td, th").map(|iter| iter.count()).ok();
    }

    metadata
}
