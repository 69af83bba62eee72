//! Reconstruction of ad-hoc bullet lists.
//!
//! Legacy pages fake lists inside a single paragraph: lines separated by
//! `<br>` where list items start with a literal `•` glyph. This module splits
//! such a paragraph into alternating runs of plain text and bullet lines and
//! re-emits proper `<p>`/`<ul>` markup, preserving run order.

use std::sync::LazyLock;

use regex::Regex;

pub const BULLET_GLYPH: char = '•';

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("line break pattern"));

#[derive(Debug, PartialEq, Eq)]
enum Run {
    Text(Vec<String>),
    List(Vec<String>),
}

/// Rebuild a paragraph's inner markup. Returns `None` when the markup
/// contains no bullet glyph, meaning the paragraph should pass through
/// unchanged.
pub fn rebuild_paragraph(inner_html: &str) -> Option<String> {
    if !inner_html.contains(BULLET_GLYPH) {
        return None;
    }

    let runs = split_runs(inner_html);
    if runs.is_empty() {
        return None;
    }

    let mut out = String::new();
    for run in runs {
        match run {
            Run::Text(lines) => {
                out.push_str("<p>");
                out.push_str(&lines.join(" "));
                out.push_str("</p>");
            }
            Run::List(items) => {
                out.push_str("<ul>");
                for item in items {
                    out.push_str("<li>");
                    out.push_str(&item);
                    out.push_str("</li>");
                }
                out.push_str("</ul>");
            }
        }
    }
    Some(out)
}

fn split_runs(inner_html: &str) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut text_lines: Vec<String> = Vec::new();
    let mut list_items: Vec<String> = Vec::new();

    for raw_line in LINE_BREAK.split(inner_html) {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix(BULLET_GLYPH) {
            if !text_lines.is_empty() {
                runs.push(Run::Text(std::mem::take(&mut text_lines)));
            }
            let item = rest.trim();
            // A bare glyph with nothing after it produces no item.
            if !item.is_empty() {
                list_items.push(item.to_string());
            }
        } else {
            if !list_items.is_empty() {
                runs.push(Run::List(std::mem::take(&mut list_items)));
            }
            text_lines.push(line.to_string());
        }
    }

    if !text_lines.is_empty() {
        runs.push(Run::Text(text_lines));
    }
    if !list_items.is_empty() {
        runs.push(Run::List(list_items));
    }
    runs
}
