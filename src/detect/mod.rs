//! Asset detection over sanitized transcript HTML.
//!
//! Two detection shapes live here:
//! - the per-instance selector path ([`detect_assets`]) that feeds
//!   share-button injection; every match gets an addressable record and an
//!   element handle;
//! - the class-intersection survey ([`survey_asset_classes`]) that tolerates
//!   inconsistent legacy markup by scoring class-token overlap, producing one
//!   consolidated record per class group for cataloging and statistics.
//!
//! The shareability helpers ([`has_shareable_assets`],
//! [`summarize_shareable_assets`]) answer the host-panel question "is there
//! anything worth sharing in this transcript" without running the full
//! transform.

pub mod class_survey;
pub mod selector;
pub mod shareability;
pub mod types;

pub use class_survey::{AssetClassSummary, survey_asset_classes};
pub use selector::{detect_assets, detect_assets_in_html, parse_asset_id};
pub use shareability::{AssetSurveyReport, AssetTypeCount, has_shareable_assets, summarize_shareable_assets};
pub use types::{DetectedAsset, DetectedInstance};
