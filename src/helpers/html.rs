//! HTML helper functions

use crate::content::LinkKind;

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Attributes of an anchor for a given link kind
///
/// In-site links are marked for client navigation, external ones open in a
/// new browsing context without a back-reference to this page.
pub fn link_attrs(kind: LinkKind) -> &'static str {
    match kind {
        LinkKind::Internal => r#" data-nav="internal""#,
        LinkKind::External => r#" target="_blank" rel="noopener noreferrer""#,
        LinkKind::Plain => "",
    }
}

/// Generate an anchor tag; `text` is escaped
///
/// # Examples
/// ```ignore
/// link_to("/about", "About") // -> <a href="/about" data-nav="internal">About</a>
/// ```
pub fn link_to(href: &str, text: &str) -> String {
    format!(
        r#"<a href="{}"{}>{}</a>"#,
        html_escape(href),
        link_attrs(LinkKind::classify(href)),
        html_escape(text)
    )
}

/// Generate an image tag with a reserved layout box
pub fn image_tag(src: &str, alt: &str, width: u32, height: u32) -> String {
    format!(
        r#"<img src="{}" alt="{}" width="{}" height="{}" loading="lazy" style="width:100%;height:auto">"#,
        html_escape(src),
        html_escape(alt),
        width,
        height
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_link_to() {
        assert_eq!(
            link_to("/about", "About"),
            r#"<a href="/about" data-nav="internal">About</a>"#
        );
        assert_eq!(
            link_to("https://example.com", "Out"),
            r#"<a href="https://example.com" target="_blank" rel="noopener noreferrer">Out</a>"#
        );
        assert_eq!(link_to("#top", "Top"), r##"<a href="#top">Top</a>"##);
    }

    #[test]
    fn test_image_tag() {
        let tag = image_tag("/a.png", "A \"quote\"", 800, 600);
        assert!(tag.contains(r#"alt="A &quot;quote&quot;""#));
        assert!(tag.contains(r#"width="800" height="600""#));
    }
}
