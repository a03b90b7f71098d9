//! Transcript asset pipeline for live study sessions.
//!
//! Session transcripts are rich HTML carrying discrete shareable fragments
//! (Quranic verse cards, hadith blocks, tables, images). This crate detects
//! those fragments, injects interactive share controls for the session host,
//! sanitizes everything for safe rendering, and re-extracts a single
//! fragment on demand for broadcast to participants.
//!
//! The flow through [`pipeline::TranscriptTransformer`]:
//! raw HTML → sanitize → detect (catalog-driven) → inject share buttons →
//! wrap. Extraction ([`extract::extract_fragment`]) runs independently
//! against the *original* transcript so delivered fragments never carry
//! injected UI.

pub mod catalog;
pub mod detect;
pub mod errors;
pub mod extract;
pub mod inject;
pub mod pipeline;
pub mod sanitize;

pub use catalog::{
    AssetClassGroup, AssetTypeDefinition, CatalogSource, DetectionStrategy, HttpCatalogSource,
    StaticCatalog,
};
pub use detect::{
    AssetClassSummary, AssetSurveyReport, DetectedAsset, detect_assets_in_html,
    has_shareable_assets, summarize_shareable_assets, survey_asset_classes,
};
pub use errors::{CatalogError, PipelineError, PipelineResult};
pub use extract::{ExtractedFragment, FragmentMetadata, extract_fragment, extract_raw_by_instance};
pub use pipeline::{
    CorrelationContext, ProcessingResult, TransformOptions, TranscriptTransformer,
};
pub use sanitize::{remove_delete_buttons, sanitize};
