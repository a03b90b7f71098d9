//! Transcript HTML sanitization.
//!
//! Raw transcript HTML arrives from the session editor and may carry:
//! - `<script>`/`<style>`/`<iframe>`/`<object>`/`<embed>`/`<link>` elements
//! - inline event handlers (onclick, onerror, ...)
//! - inline `style` attributes
//! - `javascript:` pseudo-protocol URLs in `href`/`src`
//! - leftover delete buttons from the host editing mode
//!
//! Everything here is a pure string-to-string transform. Malformed markup
//! degrades to a best-effort tree (the parser is tolerant and never throws);
//! an internal failure falls back to the original input so the transcript
//! still renders, and downstream injection is skipped by the orchestrator's
//! policy instead.

use anyhow::Result;
use ego_tree::NodeId;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Elements removed outright, contents included.
const DANGEROUS_ELEMENTS: &[&str] = &["script", "style", "iframe", "object", "embed", "link"];

static BUTTON_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("button").expect("BUG: hardcoded CSS selector 'button' is invalid")
});

/// Matches `<button>` elements whose id or class contains "delete". Used as
/// a string-level pre-pass before the DOM sanitize so editing affordances
/// never reach participants even when the surrounding markup is too broken
/// to parse.
static DELETE_BUTTON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<button[^>]*(?:id\s*=\s*"[^"]*delete[^"]*"|class\s*=\s*"[^"]*delete[^"]*")[^>]*>.*?</button>"#,
    )
    .expect("DELETE_BUTTON_RE: hardcoded regex is valid")
});

/// Strip leftover delete buttons with a regex pass.
pub fn remove_delete_buttons(html: &str) -> String {
    DELETE_BUTTON_RE.replace_all(html, "").into_owned()
}

/// Sanitize raw transcript HTML.
///
/// Returns the serialized body content with dangerous elements and
/// attributes removed. Never fails the caller: an internal error is logged
/// and the original input comes back unchanged.
pub fn sanitize(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    match sanitize_inner(html) {
        Ok(clean) => clean,
        Err(e) => {
            log::warn!("sanitize failed, returning original HTML as fallback: {e}");
            html.to_string()
        }
    }
}

fn sanitize_inner(html: &str) -> Result<String> {
    let document = Html::parse_fragment(html);
    let root = document.root_element();

    // Everything to drop: dangerous element kinds plus delete-flavored buttons.
    let mut to_remove: HashSet<NodeId> = HashSet::new();
    for name in DANGEROUS_ELEMENTS {
        let selector = Selector::parse(name)
            .map_err(|e| anyhow::anyhow!("BUG: hardcoded selector '{name}': {e}"))?;
        for elem in root.select(&selector) {
            to_remove.insert(elem.id());
        }
    }
    for button in root.select(&BUTTON_SELECTOR) {
        if is_delete_affordance(&button) {
            to_remove.insert(button.id());
        }
    }

    let mut output = String::new();
    serialize_sanitized(&root, &to_remove, &mut output);
    Ok(output)
}

fn is_delete_affordance(button: &ElementRef) -> bool {
    ["id", "class"].iter().any(|attr| {
        button
            .value()
            .attr(attr)
            .is_some_and(|v| v.to_ascii_lowercase().contains("delete"))
    })
}

/// Drop an attribute when it is an event handler, an inline style, or a
/// `javascript:` URL carrier.
fn attribute_is_dangerous(name: &str, value: &str) -> bool {
    if name.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("on")) {
        return true;
    }
    if name.eq_ignore_ascii_case("style") {
        return true;
    }
    if name.eq_ignore_ascii_case("href") || name.eq_ignore_ascii_case("src") {
        let trimmed = value.trim_start();
        if trimmed
            .get(..11)
            .is_some_and(|p| p.eq_ignore_ascii_case("javascript:"))
        {
            return true;
        }
    }
    false
}

/// Recursively serialize `element`'s children, skipping removed elements and
/// filtering dangerous attributes as tags are written out. Serializing and
/// filtering in one walk keeps the pass O(n) over the tree.
fn serialize_sanitized(element: &ElementRef, to_remove: &HashSet<NodeId>, output: &mut String) {
    if to_remove.contains(&element.id()) {
        return;
    }

    for child in element.children() {
        use scraper::node::Node;

        match child.value() {
            Node::Text(text) => {
                for ch in text.chars() {
                    match ch {
                        '<' => output.push_str("&lt;"),
                        '>' => output.push_str("&gt;"),
                        '&' => output.push_str("&amp;"),
                        c => output.push(c),
                    }
                }
            }
            Node::Element(_) => {
                if let Some(child_elem) = ElementRef::wrap(child) {
                    if to_remove.contains(&child_elem.id()) {
                        continue;
                    }

                    let elem_name = child_elem.value().name();
                    output.push('<');
                    output.push_str(elem_name);

                    for (name, value) in child_elem.value().attrs() {
                        if attribute_is_dangerous(name, value) {
                            continue;
                        }
                        output.push(' ');
                        output.push_str(name);
                        output.push_str("=\"");
                        for ch in value.chars() {
                            match ch {
                                '"' => output.push_str("&quot;"),
                                '&' => output.push_str("&amp;"),
                                '<' => output.push_str("&lt;"),
                                '>' => output.push_str("&gt;"),
                                c => output.push(c),
                            }
                        }
                        output.push('"');
                    }
                    output.push('>');

                    const VOID_ELEMENTS: &[&str] = &[
                        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
                        "param", "source", "track", "wbr",
                    ];
                    if VOID_ELEMENTS.contains(&elem_name) {
                        continue;
                    }

                    serialize_sanitized(&child_elem, to_remove, output);

                    output.push_str("</");
                    output.push_str(elem_name);
                    output.push('>');
                }
            }
            Node::Comment(comment) => {
                output.push_str("<!--");
                output.push_str(comment);
                output.push_str("-->");
            }
            _ => {}
        }
    }
}
