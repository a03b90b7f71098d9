//! Catalog entry types and detection strategy variants.

use serde::{Deserialize, Serialize};

/// How a catalog entry locates its matches inside transcript HTML.
///
/// Historically the application mixed selector-based, regex-based and
/// class-intersection detection across separate services, selected implicitly
/// by which code path was called. Here the strategy is an explicit capability
/// dispatched per catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DetectionStrategy {
    /// CSS-selector query against the parsed document. The per-instance
    /// path: every match gets its own addressable asset record.
    Selector,
    /// Class-token intersection against a set of alternative class names.
    /// Produces one consolidated record per group; used for cataloging and
    /// statistics, never for share-button injection.
    ClassIntersection { classes: Vec<String> },
    /// Raw regex over the HTML text. Matches cannot be addressed as DOM
    /// elements, so instances found this way are never injected into.
    RegexPattern { pattern: String },
}

/// One asset-type definition from the catalog.
///
/// Lower `priority` processes first; ties are broken by catalog order.
/// Immutable during a single detection pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetTypeDefinition {
    /// Unique key, e.g. `"ayah-card"`
    pub identifier: String,
    /// Human label, e.g. `"Quranic Verse"`
    pub display_name: String,
    /// Selector used by the `Selector` strategy
    pub css_selector: String,
    pub priority: i32,
    pub strategy: DetectionStrategy,
}

impl AssetTypeDefinition {
    /// Selector-strategy entry, the common case.
    pub fn selector(
        identifier: impl Into<String>,
        display_name: impl Into<String>,
        css_selector: impl Into<String>,
        priority: i32,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            display_name: display_name.into(),
            css_selector: css_selector.into(),
            priority,
            strategy: DetectionStrategy::Selector,
        }
    }
}

/// A named group of alternative class tokens for the class-intersection
/// survey. `primary_class` names the group; `classes` are the tokens any of
/// which counts as a hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetClassGroup {
    pub primary_class: String,
    pub classes: Vec<String>,
}

impl AssetClassGroup {
    pub fn new(primary_class: impl Into<String>, classes: &[&str]) -> Self {
        Self {
            primary_class: primary_class.into(),
            classes: classes.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

/// The class groups observed in legacy transcripts. Ordered so survey output
/// is deterministic.
pub fn default_class_groups() -> Vec<AssetClassGroup> {
    vec![
        AssetClassGroup::new("ayah-card", &["ayah-card"]),
        AssetClassGroup::new("inserted-hadees", &["inserted-hadees", "ahadees-content"]),
        AssetClassGroup::new("etymology-card", &["etymology-card"]),
        AssetClassGroup::new("etymology-derivative-card", &["etymology-derivative-card"]),
        AssetClassGroup::new("esotericBlock", &["esotericBlock"]),
        AssetClassGroup::new("verse-container", &["verse-container"]),
        AssetClassGroup::new("table", &["table"]),
        AssetClassGroup::new(
            "imgResponsive",
            &["imgResponsive", "fr-fic", "fr-dib", "fr-bordered"],
        ),
    ]
}
