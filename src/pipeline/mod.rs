//! Pipeline orchestration.
//!
//! The transformer sequences the whole flow (delete-button strip, sanitize,
//! gate, catalog fetch, detect, inject, structural check, container wrap)
//! and owns the guarantee that the rendering layer always receives
//! displayable HTML, with or without share controls.

pub mod context;
pub mod transformer;
pub mod wrap;

pub use context::CorrelationContext;
pub use transformer::{ProcessingResult, TransformOptions, TranscriptTransformer};
pub use wrap::{structural_warnings, wrap_in_transcript_container};
