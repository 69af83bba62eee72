//! Read-only rewrite pass over the content region.
//!
//! The source tree is never mutated: the traversal emits a rewritten HTML
//! string (replacing YouTube embeds, images, ad-hoc bullet paragraphs and
//! `<h3>` headings) and collects image references along the way. The image
//! counter is just the length of the accumulator, so the whole pass stays
//! deterministic and referentially transparent.

use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::ElementRef;

use crate::bullets;
use crate::embed;
use crate::filename::image_filename;
use crate::types::ImageRef;

/// Prefix the Markdown body uses for rewritten image paths.
pub const UPLOADS_PREFIX: &str = "/public/uploads";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenContent {
    pub html: String,
    pub images: Vec<ImageRef>,
}

/// Rewrite the inner markup of the content region.
pub fn rewrite_content(content: ElementRef) -> RewrittenContent {
    let mut rewriter = Rewriter::default();
    let mut html = String::new();
    for child in content.children() {
        rewriter.visit_node(child, &mut html);
    }
    RewrittenContent {
        html,
        images: rewriter.images,
    }
}

#[derive(Default)]
struct Rewriter {
    images: Vec<ImageRef>,
}

impl Rewriter {
    fn visit_node(&mut self, node: NodeRef<'_, Node>, out: &mut String) {
        match node.value() {
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(node) {
                    self.visit_element(element, out);
                }
            }
            // Comments, doctypes and processing instructions carry no content.
            _ => {}
        }
    }

    fn visit_element(&mut self, element: ElementRef, out: &mut String) {
        let tag = element.value().name().to_ascii_lowercase();
        match tag.as_str() {
            "iframe" => self.handle_iframe(element, out),
            "figure" => self.handle_figure(element, out),
            "img" => self.handle_image(element, out),
            "p" => self.handle_paragraph(element, out),
            // Source pages never need a separate level-3 heading, so both
            // collapse to h2 and the converter emits `##` for each.
            "h2" | "h3" => {
                let inner = self.rewrite_children(element);
                out.push_str("<h2>");
                out.push_str(&inner);
                out.push_str("</h2>");
            }
            "script" | "style" | "noscript" | "template" => {}
            _ => self.emit_generic(element, out),
        }
    }

    /// A matching YouTube iframe becomes a sentinel paragraph; anything else
    /// is passed through verbatim.
    fn handle_iframe(&mut self, element: ElementRef, out: &mut String) {
        let video_id = element
            .value()
            .attr("src")
            .and_then(embed::extract_video_id);
        match video_id {
            Some(id) => out.push_str(&embed::encode_sentinel(id)),
            None => out.push_str(&element.html()),
        }
    }

    /// A figure wrapping YouTube embeds is replaced entirely so no empty
    /// wrapper survives conversion. Other figures are kept.
    fn handle_figure(&mut self, element: ElementRef, out: &mut String) {
        let ids = collect_embed_ids(element);
        if ids.is_empty() {
            self.emit_generic(element, out);
        } else {
            for id in ids {
                out.push_str(&embed::encode_sentinel(&id));
            }
        }
    }

    fn handle_image(&mut self, element: ElementRef, out: &mut String) {
        // No src means nothing to download and nothing to emit.
        let Some(src) = element.value().attr("src") else {
            return;
        };
        let local_path = image_filename(self.images.len() + 1, src);
        let alt = element.value().attr("alt").unwrap_or("");
        out.push_str(&format!(
            "<img src=\"{UPLOADS_PREFIX}/{local_path}\" alt=\"{}\">",
            escape_attr(alt)
        ));
        self.images.push(ImageRef {
            original_url: src.to_string(),
            local_path,
        });
    }

    fn handle_paragraph(&mut self, element: ElementRef, out: &mut String) {
        let inner = self.rewrite_children(element);
        match bullets::rebuild_paragraph(&inner) {
            Some(rebuilt) => out.push_str(&rebuilt),
            None => {
                out.push_str("<p>");
                out.push_str(&inner);
                out.push_str("</p>");
            }
        }
    }

    fn emit_generic(&mut self, element: ElementRef, out: &mut String) {
        let name = element.value().name();
        out.push('<');
        out.push_str(name);
        for (attr, value) in element.value().attrs() {
            out.push(' ');
            out.push_str(attr);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        out.push('>');
        if VOID_ELEMENTS.contains(&name) {
            return;
        }
        let inner = self.rewrite_children(element);
        out.push_str(&inner);
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }

    fn rewrite_children(&mut self, element: ElementRef) -> String {
        let mut inner = String::new();
        for child in element.children() {
            self.visit_node(child, &mut inner);
        }
        inner
    }
}

/// Video ids of every YouTube iframe below `element`, in document order.
fn collect_embed_ids(element: ElementRef) -> Vec<String> {
    let mut ids = Vec::new();
    collect_embed_ids_into(element, &mut ids);
    ids
}

fn collect_embed_ids_into(element: ElementRef, ids: &mut Vec<String>) {
    for child in element.children() {
        let Some(child_element) = ElementRef::wrap(child) else {
            continue;
        };
        if child_element.value().name().eq_ignore_ascii_case("iframe") {
            if let Some(id) = child_element
                .value()
                .attr("src")
                .and_then(embed::extract_video_id)
            {
                ids.push(id.to_string());
            }
        } else {
            collect_embed_ids_into(child_element, ids);
        }
    }
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
