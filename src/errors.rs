//! Error types for the transcript asset pipeline.
//!
//! Catalog fetch failures and extraction faults get their own enums so call
//! sites can distinguish fail-open conditions (catalog unavailable) from
//! genuine processing faults. The orchestrator itself never surfaces these
//! to the rendering layer; it degrades to the unmodified input instead.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors raised while loading the asset catalog from its external source.
///
/// Every variant is treated as fail-open by the orchestrator: injection is
/// skipped and the sanitized transcript passes through unchanged.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Outbound request to the catalog endpoint failed
    #[error("catalog request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Catalog endpoint answered with a non-success status
    #[error("catalog endpoint returned status {0}")]
    Status(u16),

    /// Catalog payload could not be decoded
    #[error("failed to decode catalog payload: {0}")]
    Decode(String),
}

/// Errors raised by detection and extraction internals.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Catalog lookup failed
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A CSS selector (typically catalog-supplied) failed to parse
    #[error("invalid CSS selector '{0}'")]
    Selector(String),

    /// An asset id did not follow the `{session}-{type}-{instance}` scheme
    #[error("malformed asset id '{0}'")]
    AssetId(String),

    /// DOM serialization failed
    #[error("failed to serialize HTML: {0}")]
    Serialize(#[from] std::io::Error),
}
