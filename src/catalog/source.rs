//! Catalog sources: where asset-type definitions come from.
//!
//! Production loads the catalog over HTTP from the host API's asset-lookup
//! endpoint. The static source carries the historical built-in definitions
//! and backs tests. Either way the orchestrator treats a fetch failure as
//! fail-open: no injection, sanitized transcript passes through.

use serde::Deserialize;

use crate::errors::CatalogError;

use super::types::AssetTypeDefinition;

/// Default endpoint path on the host API.
const ASSET_LOOKUP_PATH: &str = "/api/host/asset-lookup";

/// Supplies the ordered catalog for one transform call.
///
/// The fetch is the pipeline's sole asynchronous boundary; everything
/// downstream of it runs synchronously on the calling task.
pub trait CatalogSource {
    fn fetch(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<AssetTypeDefinition>, CatalogError>> + Send;
}

/// Wire shape of one asset-lookup row.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetLookupDto {
    identifier: String,
    css_selector: Option<String>,
    display_name: Option<String>,
    is_active: bool,
}

/// Catalog backed by the host API's asset-lookup endpoint.
///
/// Inactive rows and rows without a selector are excluded before use.
/// Priority is assigned by array order, which is how the endpoint already
/// sorts its rows.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpCatalogSource {
    /// `base_url` is the host API origin, e.g. `https://sessions.example.org`.
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}{}", base_url.as_ref().trim_end_matches('/'), ASSET_LOOKUP_PATH),
        }
    }

    /// Point at a non-default endpoint, e.g. in tests.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<Vec<AssetTypeDefinition>, CatalogError> {
        let response = self.client.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                endpoint = %self.endpoint,
                status = status.as_u16(),
                "asset-lookup endpoint returned non-success status"
            );
            return Err(CatalogError::Status(status.as_u16()));
        }

        let rows: Vec<AssetLookupDto> = response
            .json()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))?;

        let definitions: Vec<AssetTypeDefinition> = rows
            .into_iter()
            .filter(|row| row.is_active)
            .filter_map(|row| {
                let selector = row.css_selector.filter(|s| !s.is_empty())?;
                let display = row.display_name.unwrap_or_else(|| row.identifier.clone());
                Some((row.identifier, display, selector))
            })
            .enumerate()
            .map(|(i, (identifier, display, selector))| {
                AssetTypeDefinition::selector(identifier, display, selector, i as i32 + 1)
            })
            .collect();

        tracing::debug!(
            endpoint = %self.endpoint,
            count = definitions.len(),
            "loaded asset catalog"
        );

        Ok(definitions)
    }
}

/// In-memory catalog. `StaticCatalog::default()` carries the built-in
/// definitions the session tooling has always shipped with.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    definitions: Vec<AssetTypeDefinition>,
}

impl StaticCatalog {
    pub fn new(definitions: Vec<AssetTypeDefinition>) -> Self {
        Self { definitions }
    }

    /// A catalog with no entries; the transform gate treats this as
    /// catalog-unavailable and skips injection.
    pub fn empty() -> Self {
        Self { definitions: Vec::new() }
    }

    pub fn definitions(&self) -> &[AssetTypeDefinition] {
        &self.definitions
    }
}

/// The definitions the session tooling has always shipped with.
pub fn builtin_definitions() -> Vec<AssetTypeDefinition> {
    vec![
        AssetTypeDefinition::selector("ayah-card", "Quranic Verse", ".ayah-card", 1),
        AssetTypeDefinition::selector(
            "ahadees-content",
            "Hadith Content",
            "[class*='ahadees'], [id*='ahadees']",
            1,
        ),
        AssetTypeDefinition::selector(
            "inline-arabic",
            "Arabic Text",
            ".inlineArabic, .arabic-text",
            2,
        ),
        AssetTypeDefinition::selector(
            "islamic-table",
            "Islamic Table",
            ".islamic-table, .content-table, .comparison-table",
            1,
        ),
        AssetTypeDefinition::selector("image-asset", "Image Asset", "img", 3),
    ]
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new(builtin_definitions())
    }
}

impl CatalogSource for StaticCatalog {
    async fn fetch(&self) -> Result<Vec<AssetTypeDefinition>, CatalogError> {
        Ok(self.definitions.clone())
    }
}
