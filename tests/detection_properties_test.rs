use noor_canvas_assets::pipeline::wrap_in_transcript_container;
use noor_canvas_assets::{AssetTypeDefinition, detect_assets_in_html};
use proptest::prelude::*;

fn ayah_catalog() -> Vec<AssetTypeDefinition> {
    vec![AssetTypeDefinition::selector(
        "ayah-card",
        "Quranic Verse",
        ".ayah-card",
        1,
    )]
}

#[test]
fn redetecting_injected_html_finds_the_same_assets_in_order() {
    let html: String = (1..=5)
        .map(|i| format!(r#"<div class="ayah-card">verse {i}</div>"#))
        .collect();

    let rt = tokio::runtime::Runtime::new().unwrap();
    let result = rt.block_on(async {
        let transformer = noor_canvas_assets::TranscriptTransformer::new(
            noor_canvas_assets::StaticCatalog::new(ayah_catalog()),
        );
        transformer
            .transform(
                &html,
                Some(42),
                Some("Active"),
                &noor_canvas_assets::CorrelationContext::new(),
            )
            .await
    });
    assert_eq!(result.injected_count, 5);

    // The injected buttons are new siblings, but every original element is
    // still present, addressable, and in the original relative order.
    let redetected = detect_assets_in_html(&result.processed_html, &ayah_catalog(), 42);
    assert_eq!(redetected.len(), 5);
    for (i, asset) in redetected.iter().enumerate() {
        assert_eq!(asset.asset_id, format!("42-ayah-card-{}", i + 1));
    }
}

proptest! {
    #[test]
    fn wrapping_is_idempotent_for_any_content(html in ".{0,200}") {
        let once = wrap_in_transcript_container(&html);
        let twice = wrap_in_transcript_container(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn detection_is_deterministic_over_generated_transcripts(
        card_count in 0usize..8,
        session_id in 1i64..10_000,
    ) {
        let html: String = (0..card_count)
            .map(|i| format!(r#"<p>para {i}</p><div class="ayah-card">verse {i}</div>"#))
            .collect();

        let first = detect_assets_in_html(&html, &ayah_catalog(), session_id);
        let second = detect_assets_in_html(&html, &ayah_catalog(), session_id);

        prop_assert_eq!(first.len(), card_count);
        let first_ids: Vec<&str> = first.iter().map(|a| a.asset_id.as_str()).collect();
        let second_ids: Vec<&str> = second.iter().map(|a| a.asset_id.as_str()).collect();
        prop_assert_eq!(&first_ids, &second_ids);
        for (i, id) in first_ids.iter().enumerate() {
            prop_assert_eq!(*id, format!("{}-ayah-card-{}", session_id, i + 1));
        }
    }
}
