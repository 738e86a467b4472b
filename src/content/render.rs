//! Presentation of parsed thought bodies
//!
//! Every [`Node`] kind has exactly one rule here; the class names are the
//! hooks the studio stylesheet targets.

use super::markdown::{self, Document, Image, Node};
use super::ContentError;
use crate::helpers::{html_escape, image_tag, link_attrs};

/// Label shown above every code block
const CODE_LABEL: &str = "Code";

/// Alt text used when an image has none
const DEFAULT_ALT: &str = "Image";

/// Render a parsed document to HTML
pub fn render_html(doc: &Document) -> String {
    let mut out = String::new();
    render_nodes(&doc.nodes, &mut out);
    out
}

/// Parse and render a raw MDX body
pub fn render_body(body: &str) -> Result<String, ContentError> {
    let doc = markdown::parse(body)?;
    Ok(render_html(&doc))
}

fn render_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        render_node(node, out);
    }
}

fn wrap(out: &mut String, open: &str, children: &[Node], close: &str) {
    out.push_str(open);
    render_nodes(children, out);
    out.push_str(close);
}

fn render_node(node: &Node, out: &mut String) {
    match node {
        Node::Heading { level, children } if (1..=3).contains(level) => wrap(
            out,
            &format!(r#"<h{0} class="prose-h{0}">"#, level),
            children,
            &format!("</h{}>\n", level),
        ),
        Node::Heading { level, children } => wrap(
            out,
            &format!("<h{}>", level),
            children,
            &format!("</h{}>\n", level),
        ),
        Node::Paragraph(children) => wrap(out, r#"<p class="prose-p">"#, children, "</p>\n"),
        Node::Link {
            href,
            kind,
            title,
            children,
        } => {
            let title_attr = title
                .as_ref()
                .map(|t| format!(r#" title="{}""#, html_escape(t)))
                .unwrap_or_default();
            let open = format!(
                r#"<a href="{}"{}{}>"#,
                html_escape(href),
                title_attr,
                link_attrs(*kind)
            );
            wrap(out, &open, children, "</a>");
        }
        Node::Image(image) => render_image(image, out),
        Node::BlockQuote(children) => wrap(
            out,
            "<blockquote class=\"prose-quote\">\n",
            children,
            "</blockquote>\n",
        ),
        Node::CodeBlock { language, code } => {
            let class = language
                .as_ref()
                .map(|lang| format!(r#" class="language-{}""#, html_escape(lang)))
                .unwrap_or_default();
            out.push_str(&format!(
                concat!(
                    r#"<div class="prose-code">"#,
                    r#"<div class="prose-code-header">{}</div>"#,
                    r#"<pre><code{}>{}</code></pre>"#,
                    "</div>\n"
                ),
                CODE_LABEL,
                class,
                html_escape(code)
            ));
        }
        Node::InlineCode(code) => {
            out.push_str(&format!(
                r#"<code class="prose-inline-code">{}</code>"#,
                html_escape(code)
            ));
        }
        Node::List {
            start: Some(start),
            items,
        } => {
            let start_attr = if *start == 1 {
                String::new()
            } else {
                format!(r#" start="{}""#, start)
            };
            wrap(
                out,
                &format!("<ol class=\"prose-ol\"{}>\n", start_attr),
                items,
                "</ol>\n",
            );
        }
        Node::List { start: None, items } => {
            wrap(out, "<ul class=\"prose-ul\">\n", items, "</ul>\n")
        }
        Node::ListItem(children) => wrap(out, r#"<li class="prose-li">"#, children, "</li>\n"),
        Node::ThematicBreak => out.push_str("<hr class=\"prose-divider\">\n"),
        Node::Emphasis(children) => wrap(out, "<em>", children, "</em>"),
        Node::Strong(children) => wrap(out, "<strong>", children, "</strong>"),
        Node::Strikethrough(children) => wrap(out, "<del>", children, "</del>"),
        Node::Text(text) => out.push_str(&html_escape(text)),
        Node::SoftBreak => out.push('\n'),
        Node::HardBreak => out.push_str("<br>\n"),
    }
}

fn render_image(image: &Image, out: &mut String) {
    let alt = if image.alt.is_empty() {
        DEFAULT_ALT
    } else {
        image.alt.as_str()
    };

    out.push_str(r#"<figure class="prose-figure">"#);
    out.push_str(&image_tag(&image.src, alt, image.width, image.height));
    if let Some(caption) = &image.caption {
        out.push_str(&format!(
            r#"<figcaption class="prose-caption">{}</figcaption>"#,
            html_escape(caption)
        ));
    }
    out.push_str("</figure>");
}
