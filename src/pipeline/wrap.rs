//! Root container wrapping and post-transform structural checks.

/// Opening tags the transcript container can already start with.
const CONTAINER_PREFIXES: [&str; 2] = [
    r#"<div class="ks-transcript""#,
    r#"<div class='ks-transcript'"#,
];

/// Wrap the transformed transcript in the single `ks-transcript` scoping
/// container. Idempotent: content already starting with the container is
/// returned unchanged, so repeated wrapping never nests roots.
pub fn wrap_in_transcript_container(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let trimmed = html.trim_start();
    if CONTAINER_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
        return html.to_string();
    }
    format!(r#"<div class="ks-transcript">{html}</div>"#)
}

/// Structural sanity warnings for transformed HTML. Violations never block
/// output; the orchestrator logs whatever comes back.
pub fn structural_warnings(html: &str) -> Vec<String> {
    let mut warnings = Vec::new();

    if html.contains("<button") && !html.contains("</button>") {
        warnings.push("unclosed button tags in transformed HTML".to_string());
    }

    let div_opens = html.matches("<div").count();
    let div_closes = html.matches("</div>").count();
    if div_opens != div_closes {
        warnings.push(format!(
            "unbalanced div tags in transformed HTML ({div_opens} open, {div_closes} close)"
        ));
    }

    warnings
}
