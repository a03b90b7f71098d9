//! The transcript transformer: sanitize → detect → inject → wrap.
//!
//! Four linear stages, no branching back. The catalog fetch is the only
//! asynchronous boundary; everything else runs synchronously on the calling
//! task, and concurrent transforms share no mutable state. Rendering
//! correctness beats asset sharing throughout: every failure path degrades
//! to displayable HTML (sanitized, or the verbatim original) instead of
//! propagating an error to the rendering layer.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use kuchiki::NodeRef;
use kuchiki::traits::TendrilSink;
use serde::Serialize;

use crate::catalog::CatalogSource;
use crate::detect::{DetectedAsset, detect_assets};
use crate::inject::{inject_share_buttons, sort_for_injection};
use crate::sanitize::{remove_delete_buttons, sanitize};

use super::context::CorrelationContext;
use super::wrap::{structural_warnings, wrap_in_transcript_container};

/// Transform behavior knobs.
///
/// Historical call sites disagreed on whether `"Waiting"` sessions get share
/// buttons, so the status allow-list is configuration; the default covers
/// both readings until product settles it.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Master switch for share-button injection
    pub inject_share_buttons: bool,
    /// Session statuses for which injection may run
    pub allowed_statuses: Vec<String>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            inject_share_buttons: true,
            allowed_statuses: vec!["Active".to_string(), "Waiting".to_string()],
        }
    }
}

impl TransformOptions {
    pub fn with_injection(mut self, inject: bool) -> Self {
        self.inject_share_buttons = inject;
        self
    }

    pub fn with_allowed_statuses<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_statuses = statuses.into_iter().map(Into::into).collect();
        self
    }

    fn status_allows(&self, status: Option<&str>) -> bool {
        status.is_some_and(|s| self.allowed_statuses.iter().any(|a| a == s))
    }
}

/// Output envelope of one transform call.
///
/// On any failure `processed_html` falls back to the original (or empty)
/// input; the pipeline never hands the rendering layer partial or
/// malformed HTML.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingResult {
    pub processed_html: String,
    /// Detection records in catalog-order-then-document-order
    pub detected_assets: Vec<DetectedAsset>,
    pub injected_count: usize,
    pub success: bool,
    pub message: String,
    pub session_id: Option<i64>,
    pub processed_at: DateTime<Utc>,
}

impl ProcessingResult {
    fn finished(
        html: String,
        assets: Vec<DetectedAsset>,
        injected: usize,
        message: String,
        session_id: Option<i64>,
    ) -> Self {
        Self {
            processed_html: html,
            detected_assets: assets,
            injected_count: injected,
            success: true,
            message,
            session_id,
            processed_at: Utc::now(),
        }
    }

    fn failed(original: &str, message: String, session_id: Option<i64>) -> Self {
        Self {
            processed_html: original.to_string(),
            detected_assets: Vec::new(),
            injected_count: 0,
            success: false,
            message,
            session_id,
            processed_at: Utc::now(),
        }
    }
}

/// Façade over the whole pipeline, generic over where the catalog comes
/// from. Request-scoped and stateless between calls.
#[derive(Debug, Clone)]
pub struct TranscriptTransformer<S: CatalogSource> {
    source: S,
    options: TransformOptions,
}

impl<S: CatalogSource> TranscriptTransformer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            options: TransformOptions::default(),
        }
    }

    pub fn with_options(source: S, options: TransformOptions) -> Self {
        Self { source, options }
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Transform raw transcript HTML into safe, share-annotated markup.
    ///
    /// Never fails the caller: unexpected errors are logged with full
    /// context and the original input comes back verbatim.
    pub async fn transform(
        &self,
        raw_html: &str,
        session_id: Option<i64>,
        session_status: Option<&str>,
        ctx: &CorrelationContext,
    ) -> ProcessingResult {
        if raw_html.is_empty() {
            return ProcessingResult::finished(
                String::new(),
                Vec::new(),
                0,
                "empty transcript content".to_string(),
                session_id,
            );
        }

        match self
            .transform_inner(raw_html, session_id, session_status, ctx)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(
                    run_id = %ctx,
                    session_id,
                    input_length = raw_html.len(),
                    error = %e,
                    "transcript transformation failed, returning original HTML"
                );
                ProcessingResult::failed(raw_html, format!("processing error: {e}"), session_id)
            }
        }
    }

    async fn transform_inner(
        &self,
        raw_html: &str,
        session_id: Option<i64>,
        session_status: Option<&str>,
        ctx: &CorrelationContext,
    ) -> Result<ProcessingResult> {
        let without_deletes = remove_delete_buttons(raw_html);
        let sanitized = sanitize(&without_deletes);

        let should_inject = self.options.inject_share_buttons
            && !sanitized.trim().is_empty()
            && session_id.is_some()
            && self.options.status_allows(session_status);

        tracing::info!(
            run_id = %ctx,
            session_id,
            status = session_status.unwrap_or("none"),
            content_length = sanitized.len(),
            should_inject,
            "transform decision"
        );

        let (final_html, assets, injected) = if should_inject {
            // Gate checked session_id above.
            let session = session_id.context("session id vanished past the gate")?;
            match self.source.fetch().await {
                Ok(catalog) if catalog.is_empty() => {
                    tracing::warn!(run_id = %ctx, "no active asset types in catalog, skipping injection");
                    (sanitized, Vec::new(), 0)
                }
                Ok(catalog) => self.detect_and_inject(&sanitized, &catalog, session, ctx)?,
                Err(e) => {
                    tracing::warn!(
                        run_id = %ctx,
                        error = %e,
                        "catalog unavailable, skipping injection"
                    );
                    (sanitized, Vec::new(), 0)
                }
            }
        } else {
            tracing::debug!(run_id = %ctx, "share-button injection skipped by gate");
            (sanitized, Vec::new(), 0)
        };

        for warning in structural_warnings(&final_html) {
            tracing::warn!(run_id = %ctx, "{warning}");
        }

        let wrapped = wrap_in_transcript_container(&final_html);
        let message = format!(
            "processed {} assets, injected {} share buttons",
            assets.len(),
            injected
        );
        tracing::info!(
            run_id = %ctx,
            assets = assets.len(),
            injected,
            output_length = wrapped.len(),
            "transform complete"
        );

        Ok(ProcessingResult::finished(
            wrapped, assets, injected, message, session_id,
        ))
    }

    fn detect_and_inject(
        &self,
        sanitized: &str,
        catalog: &[crate::catalog::AssetTypeDefinition],
        session_id: i64,
        ctx: &CorrelationContext,
    ) -> Result<(String, Vec<DetectedAsset>, usize)> {
        let document = kuchiki::parse_html().one(sanitized.to_string());

        let mut instances = detect_assets(&document, catalog, session_id);
        tracing::info!(
            run_id = %ctx,
            detected = instances.len(),
            "asset detection complete"
        );
        if instances.is_empty() {
            return Ok((sanitized.to_string(), Vec::new(), 0));
        }

        // Keep detection order for the result envelope; the injector needs
        // its own descending-position order.
        let records: Vec<DetectedAsset> = instances.iter().map(|i| i.record.clone()).collect();
        sort_for_injection(&mut instances);
        let injected = inject_share_buttons(&instances);
        drop(instances); // element handles end with the injection pass

        let html = serialize_body_children(&document)?;
        Ok((html, records, injected))
    }
}

/// Serialize the children of `<body>`. The transform works on body content,
/// not a full document.
fn serialize_body_children(document: &NodeRef) -> Result<String> {
    let body = document
        .select_first("body")
        .map_err(|()| anyhow::anyhow!("parsed document has no body"))?;
    let mut out = Vec::new();
    for child in body.as_node().children() {
        child
            .serialize(&mut out)
            .context("failed to serialize transformed transcript")?;
    }
    Ok(String::from_utf8_lossy(&out).into_owned())
}
