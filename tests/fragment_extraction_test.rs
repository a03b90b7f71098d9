use noor_canvas_assets::{
    AssetTypeDefinition, CorrelationContext, StaticCatalog, TranscriptTransformer,
    extract_fragment, extract_raw_by_instance,
};

const ORIGINAL: &str = r#"
    <p>Tonight we read from Surah al-Baqarah.</p>
    <div class="ayah-card" data-surah="2" data-ayah="255">Ayat al-Kursi text</div>
    <p>Commentary follows.</p>
    <div class="ayah-card" data-surah="2" data-ayah="286">Final verses</div>
"#;

fn catalog() -> Vec<AssetTypeDefinition> {
    vec![AssetTypeDefinition::selector(
        "ayah-card",
        "Quranic Verse",
        ".ayah-card",
        1,
    )]
}

#[test]
fn fragment_round_trips_from_the_original_transcript() {
    // The id a host persisted after a transform re-finds the same element
    // in a fresh parse of the original, uninjected HTML.
    let fragment = extract_fragment(ORIGINAL, "42-ayah-card-1", &catalog())
        .unwrap()
        .expect("first ayah card should be found");

    assert_eq!(fragment.asset_type, "ayah-card");
    assert_eq!(fragment.text_content, "Ayat al-Kursi text");
    assert!(fragment.html.contains(r#"data-ayah="255""#));
    assert!(!fragment.html.contains("ks-share"));
    assert_eq!(fragment.metadata.tag_name, "div");
}

#[tokio::test]
async fn extraction_from_transformed_html_returns_the_asset_not_the_button() {
    let transformer = TranscriptTransformer::new(StaticCatalog::new(catalog()));
    let transformed = transformer
        .transform(ORIGINAL, Some(42), Some("Active"), &CorrelationContext::new())
        .await;
    assert_eq!(transformed.injected_count, 2);

    // The transformed document carries the asset id on both the share
    // button and the element; extraction must resolve to the element.
    let fragment = extract_fragment(&transformed.processed_html, "42-ayah-card-2", &catalog())
        .unwrap()
        .expect("stamped element should be found");
    assert_eq!(fragment.text_content, "Final verses");
    assert!(!fragment.html.contains("ks-share-button"));
}

#[test]
fn broadcast_payload_matches_what_participants_should_see() {
    let fragment = extract_fragment(ORIGINAL, "42-ayah-card-2", &catalog())
        .unwrap()
        .unwrap();
    assert_eq!(fragment.metadata.text_preview, "Final verses");
    assert_eq!(fragment.metadata.css_class.as_deref(), Some("ayah-card"));
}

#[test]
fn unknown_id_is_not_found_rather_than_an_error() {
    assert!(extract_fragment(ORIGINAL, "42-ayah-card-9", &catalog())
        .unwrap()
        .is_none());
    assert!(extract_fragment(ORIGINAL, "other-session-1", &catalog())
        .unwrap()
        .is_none());
}

#[test]
fn legacy_raw_extraction_selects_by_instance_number() {
    let first = extract_raw_by_instance(ORIGINAL, "ayah-card", 1).unwrap();
    assert!(first.contains("Ayat al-Kursi text"));

    let second = extract_raw_by_instance(ORIGINAL, "ayah-card", 2).unwrap();
    assert!(second.contains("Final verses"));

    assert!(extract_raw_by_instance(ORIGINAL, "ayah-card", 3).is_none());
}
