//! Detection result types.

use chrono::{DateTime, Utc};
use kuchiki::NodeRef;
use serde::{Deserialize, Serialize};

/// One detected asset occurrence.
///
/// `asset_id` is a deterministic function of `(session_id, asset_type,
/// instance_number)`, so repeated detection passes over the same HTML mint
/// the same identifiers. That determinism is what lets the fragment
/// extractor re-find an element from a persisted id in a fresh parse; no
/// object identity survives across calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedAsset {
    /// `"{session_id}-{asset_type}-{instance_number}"`, unique per transcript
    pub asset_id: String,
    /// Catalog identifier of the matched type
    pub asset_type: String,
    /// Human label carried into the share-button text
    pub display_name: String,
    /// 1-based ordinal among same-type matches, in document order
    pub instance_number: u32,
    /// Element-sibling index under the parent; ordering key for injection
    pub dom_position: usize,
    /// Head of the matched text for regex-pattern instances; `None` on the
    /// selector path
    pub fragment_hint: Option<String>,
    pub detected_at: DateTime<Utc>,
}

/// A detected asset paired with its live element handle.
///
/// The handle is owned by the detection pass: the injector mutates the
/// element in place (attribute stamping, button insertion) and the handle is
/// dropped once the transform completes. Regex-pattern matches carry no
/// handle, since a text match cannot be addressed as a DOM node, and are
/// skipped by the injector.
#[derive(Clone)]
pub struct DetectedInstance {
    pub record: DetectedAsset,
    pub element: Option<NodeRef>,
}

impl std::fmt::Debug for DetectedInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectedInstance")
            .field("record", &self.record)
            .field("has_element", &self.element.is_some())
            .finish()
    }
}
