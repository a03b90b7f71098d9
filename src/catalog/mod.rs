//! Asset catalog: the ordered list of asset-type definitions driving detection.
//!
//! The catalog is the single source of truth for "what counts as a shareable
//! asset". It is supplied by an external source (HTTP endpoint backed by the
//! asset lookup table) and treated as read-only for the duration of one
//! detection pass. A built-in static catalog mirrors the session tooling's
//! historical defaults for offline use and tests.

pub mod source;
pub mod types;

pub use source::{CatalogSource, HttpCatalogSource, StaticCatalog, builtin_definitions};
pub use types::{AssetClassGroup, AssetTypeDefinition, DetectionStrategy, default_class_groups};
