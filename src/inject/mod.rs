//! Share-button injection.
//!
//! For every detected asset instance the injector stamps addressing
//! attributes onto the element and inserts a share control as its
//! immediately preceding sibling. Insertion order is the load-bearing
//! invariant: each button becomes a new sibling *before* its asset, which
//! shifts the sibling indices of everything after it under the same parent.
//! Processing instances in descending `dom_position` order guarantees every
//! not-yet-processed element still sits at its recorded position when its
//! turn comes. Callers must pre-sort; [`sort_for_injection`] does it and the
//! injector asserts the precondition rather than trusting discipline.

use kuchiki::traits::TendrilSink;

use crate::detect::DetectedInstance;

/// CSS class stamped onto every addressable asset element.
const SHAREABLE_CLASS: &str = "noor-shareable-asset";

/// Sort instances into the order the injector requires: descending
/// `dom_position`, detection order preserved among equals.
pub fn sort_for_injection(instances: &mut [DetectedInstance]) {
    instances.sort_by(|a, b| b.record.dom_position.cmp(&a.record.dom_position));
}

/// Stamp addressing attributes and insert share buttons.
///
/// Precondition: `instances` sorted by descending `dom_position` (see
/// [`sort_for_injection`]). Returns the number of buttons actually inserted;
/// handle-less instances and elements without a parent are skipped with a
/// log line, not an error.
pub fn inject_share_buttons(instances: &[DetectedInstance]) -> usize {
    debug_assert!(
        instances
            .windows(2)
            .all(|w| w[0].record.dom_position >= w[1].record.dom_position),
        "injection requires instances sorted by descending dom_position"
    );

    let mut injected = 0;
    for instance in instances {
        let record = &instance.record;

        let Some(element) = &instance.element else {
            tracing::debug!(
                asset_id = %record.asset_id,
                "no element handle (regex-pattern match), skipping injection"
            );
            continue;
        };

        if element.parent().is_none() {
            tracing::warn!(
                asset_id = %record.asset_id,
                "element has no parent, cannot inject share button"
            );
            continue;
        }

        stamp_asset_attributes(element, record);

        let share_id = generate_share_id();
        let button = build_share_button(record, &share_id);
        element.insert_before(button);
        injected += 1;

        tracing::debug!(
            asset_id = %record.asset_id,
            share_id = %share_id,
            "share button injected"
        );
    }
    injected
}

/// Short click-correlation token, independent of the deterministic asset id.
fn generate_share_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}

fn stamp_asset_attributes(element: &kuchiki::NodeRef, record: &crate::detect::DetectedAsset) {
    let Some(data) = element.as_element() else {
        return;
    };
    let mut attrs = data.attributes.borrow_mut();
    attrs.insert("data-asset-id", record.asset_id.clone());
    attrs.insert("data-asset-type", record.asset_type.clone());
    attrs.insert("data-asset-position", record.dom_position.to_string());

    let existing = attrs.get("class").unwrap_or("").to_string();
    if !existing.split_whitespace().any(|c| c == SHAREABLE_CLASS) {
        let merged = if existing.is_empty() {
            SHAREABLE_CLASS.to_string()
        } else {
            format!("{existing} {SHAREABLE_CLASS}")
        };
        attrs.insert("class", merged);
    }
}

/// Build the share control as a detached node. The button carries both the
/// deterministic asset id (correlates with the stamped element) and a fresh
/// share id (click-correlation token). All user-supplied text is
/// entity-encoded before it reaches attribute or text position.
fn build_share_button(record: &crate::detect::DetectedAsset, share_id: &str) -> kuchiki::NodeRef {
    let encoded_asset_id = html_escape::encode_double_quoted_attribute(&record.asset_id);
    let encoded_type = html_escape::encode_double_quoted_attribute(&record.asset_type);
    let encoded_share_id = html_escape::encode_double_quoted_attribute(share_id);
    let label = html_escape::encode_text(&record.display_name.to_uppercase()).into_owned();
    let instance_number = record.instance_number;

    let button_html = format!(
        r#"<div class="ks-share-wrapper"><button class="ks-share-button ks-share-red" data-share-button="asset" data-share-id="{encoded_share_id}" data-asset-id="{encoded_asset_id}" data-asset-type="{encoded_type}" data-instance-number="{instance_number}" type="button">📤 SHARE {label} #{instance_number}</button></div>"#
    );

    let fragment = kuchiki::parse_html().one(button_html);
    fragment
        .select_first("div.ks-share-wrapper")
        .map(|wrapper| wrapper.as_node().clone())
        .unwrap_or(fragment)
}
