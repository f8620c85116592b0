// DevPanel - core/render.rs
//
// Pure rendering of backend reports to HTML fragments. No I/O, no state.
//
// The output structure is a compatibility contract with the dashboard
// stylesheet (doc-function / doc-errors / doc-warns classes): nested <ul>
// lists, empty sections suppressed entirely. Every free-text value is
// escaped to numeric character references before insertion so report
// content can never inject live markup.

use crate::core::model::{BreakingChangesReport, CommandCheck, CommandDoc};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;

// =============================================================================
// Escaping
// =============================================================================

/// Escape special characters to decimal numeric character references.
///
/// Covers the range U+00A0..=U+9999 plus `<`, `>`, `&`. Everything else
/// (including ASCII text and whitespace) passes through unchanged.
pub fn escape_specials(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '<' | '>' | '&' | '\u{00A0}'..='\u{9999}' => {
                // write! to a String cannot fail.
                let _ = write!(out, "&#{};", c as u32);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Plain-text rendering of a JSON default value.
///
/// Strings render bare (no quotes); other values use their JSON form.
fn default_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// =============================================================================
// Documentation report
// =============================================================================

/// Render a documentation report and its per-command findings to HTML.
///
/// Per command: errors first (only if non-empty), then warnings (only if
/// non-empty), then Args / Returns / Raises sections, each suppressed when
/// empty. Commands render in sorted name order.
pub fn doc_check_to_html(
    doc: &BTreeMap<String, CommandDoc>,
    check: &HashMap<String, CommandCheck>,
) -> String {
    let empty_check = CommandCheck::default();
    let mut html = String::from("<ul>");

    for (command, data) in doc {
        let _ = write!(
            html,
            "<li class=\"doc-function\"><span>Command {}</span><ul>",
            escape_specials(command)
        );

        let findings = check.get(command).unwrap_or(&empty_check);
        html.push_str(&findings_html("Errors:", "doc-errors", &findings.errors));
        html.push_str(&findings_html("Warnings:", "doc-warns", &findings.warnings));

        // Args
        if !data.args.is_empty() {
            html.push_str("<li><span>Args</span><ul>");
        }
        for arg in &data.args {
            let _ = write!(
                html,
                "<li><span>{}</span><ul><li>Type: {}</li>",
                escape_specials(&arg.name),
                escape_specials(&arg.type_name)
            );
            if arg.optional {
                html.push_str("<li>Optional: true</li>");
            }
            if let Some(default) = arg.default.as_ref().filter(|v| !v.is_null()) {
                let _ = write!(
                    html,
                    "<li>default: {}</li>",
                    escape_specials(&default_text(default))
                );
            }
            let _ = write!(
                html,
                "<li>Description: {}</li>",
                escape_specials(&arg.description)
            );
            html.push_str(&formats_html(&arg.formats));
            html.push_str("</ul></li>");
        }
        if !data.args.is_empty() {
            html.push_str("</ul></li>");
        }

        // Returns
        if !data.returns.is_empty() {
            html.push_str("<li><span>Returns</span><ul>");
        }
        for ret in &data.returns {
            let _ = write!(
                html,
                "<li><span>{}</span><ul><li>Description: {}</li>",
                escape_specials(&ret.type_name),
                escape_specials(&ret.description)
            );
            html.push_str(&formats_html(&ret.formats));
            html.push_str("</ul></li>");
        }
        if !data.returns.is_empty() {
            html.push_str("</ul></li>");
        }

        // Raises
        if !data.raises.is_empty() {
            html.push_str("<li><span>Raises</span><ul>");
        }
        for raise in &data.raises {
            let _ = write!(
                html,
                "<li><span>{}</span><ul><li>Description: {}</li></ul></li>",
                escape_specials(&raise.type_name),
                escape_specials(&raise.description)
            );
        }
        if !data.raises.is_empty() {
            html.push_str("</ul></li>");
        }

        html.push_str("</ul></li>");
    }

    html.push_str("</ul>");
    html
}

/// Itemised findings sub-list, suppressed entirely when `items` is empty.
fn findings_html(label: &str, class: &str, items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let mut html = format!("<li><span>{label}</span><ul class=\"{class}\">");
    for item in items {
        let _ = write!(html, "<li>{}</li>", escape_specials(item));
    }
    html.push_str("</ul></li>");
    html
}

/// Nested "Formats" sub-list, suppressed entirely when `formats` is empty.
///
/// The colon after the closing </span> is part of the stylesheet contract.
fn formats_html(formats: &[String]) -> String {
    if formats.is_empty() {
        return String::new();
    }
    let mut html = String::from("<li><span>Formats</span>:<ul>");
    for format in formats {
        let _ = write!(html, "<li>{}</li>", escape_specials(format));
    }
    html.push_str("</ul></li>");
    html
}

// =============================================================================
// Breaking changes report
// =============================================================================

/// Render a breaking-changes report to HTML.
///
/// Empty error and warning lists each render a distinct "none detected"
/// line; non-empty lists render itemised.
pub fn breaking_changes_to_html(report: &BreakingChangesReport) -> String {
    let mut html = String::from("<ul class=\"breaking-changes\">");

    if report.errors.is_empty() {
        html.push_str("<li class=\"no-findings\">No breaking change detected</li>");
    } else {
        html.push_str(&findings_html("Errors:", "doc-errors", &report.errors));
    }

    if report.warnings.is_empty() {
        html.push_str("<li class=\"no-findings\">No warning detected</li>");
    } else {
        html.push_str(&findings_html("Warnings:", "doc-warns", &report.warnings));
    }

    html.push_str("</ul>");
    html
}

// =============================================================================
// Unit tests
// =============================================================================
