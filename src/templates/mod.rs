//! Page templates for the Thoughts section
//!
//! Pages are assembled from small HTML fragments; all post-supplied text
//! goes through [`html_escape`] and bodies arrive already rendered.

use std::fmt::Write;

use crate::config::SiteConfig;
use crate::content::{PostDefaults, PostRecord};
use crate::helpers::{
    full_url_for, html_escape, link_to, linkedin_share_url, post_url, time_tag,
    twitter_share_url, url_for,
};

/// Message shown when there is nothing to list
pub const EMPTY_STATE_TITLE: &str = "No posts found";
const EMPTY_STATE_TEXT: &str = "We haven't published any thoughts yet. Check back soon!";

/// Renders the list, detail and error pages
pub struct TemplateRenderer {
    config: SiteConfig,
}

impl TemplateRenderer {
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    /// List view: one card per thought, or the empty state
    pub fn index(&self, posts: &[PostRecord]) -> String {
        let mut content = format!(
            concat!(
                "<section class=\"thoughts-intro\">\n",
                "<h1>{}</h1>\n",
                "<p>{}</p>\n",
                "</section>\n"
            ),
            html_escape(&self.config.tagline),
            html_escape(&self.config.description)
        );

        if posts.is_empty() {
            let _ = write!(
                content,
                concat!(
                    "<div class=\"thoughts-empty\">\n",
                    "<div class=\"prompt\">$ ls -la</div>\n",
                    "<h3>{}</h3>\n",
                    "<p>{}</p>\n",
                    "</div>\n"
                ),
                EMPTY_STATE_TITLE,
                html_escape(EMPTY_STATE_TEXT)
            );
        } else {
            content.push_str("<div class=\"thoughts-list\">\n");
            for post in posts {
                content.push_str(&self.card(post));
            }
            content.push_str("</div>\n");
        }

        content.push_str(&self.contribute());

        self.layout(&self.config.tagline, &content)
    }

    fn card(&self, post: &PostRecord) -> String {
        let mut meta = String::new();
        if let Some(date) = &post.published_at {
            meta.push_str(&time_tag(date, &self.config.date_format));
        }
        let _ = write!(
            meta,
            r#"<span class="reading-time">{}</span>"#,
            html_escape(&post.reading_time)
        );

        format!(
            concat!(
                "<article class=\"thought-card\">\n",
                "<a href=\"{}\" data-nav=\"internal\">\n",
                "<div class=\"meta\">{}</div>\n",
                "<h2>{}</h2>\n",
                "<p>{}</p>\n",
                "{}",
                "</a>\n",
                "</article>\n"
            ),
            html_escape(&post_url(&self.config, post.identifier.as_str())),
            meta,
            html_escape(&post.title),
            html_escape(&post.description),
            tag_badges(&post.tags)
        )
    }

    fn contribute(&self) -> String {
        let mailto = format!(
            "mailto:{}?subject=Thoughts%20Contribution",
            self.config.contact_email
        );
        format!(
            concat!(
                "<aside class=\"thoughts-contribute\">\n",
                "<div class=\"prompt\">$ echo \"Want to contribute?\"</div>\n",
                "<p>Have a thought or idea you&#39;d like to share? ",
                "We&#39;re always looking for guest posts from fellow craftspeople.</p>\n",
                "<p>{}</p>\n",
                "</aside>\n"
            ),
            link_to(&mailto, "Send us your ideas →")
        )
    }

    /// Detail view around an already rendered body
    pub fn post(&self, post: &PostRecord, body_html: &str) -> String {
        let content = format!(
            "<article class=\"thought\">\n{}{}{}{}</article>\n",
            self.post_header(post),
            self.post_frame(post, body_html),
            self.post_footer(post),
            self.more_thoughts()
        );
        self.layout(&post.title, &content)
    }

    /// Detail view for a thought whose body could not be parsed
    pub fn unavailable(&self, post: &PostRecord) -> String {
        let body = concat!(
            "<div class=\"thought-unavailable\">\n",
            "<h3>Content unavailable</h3>\n",
            "<p>This thought could not be displayed right now.</p>\n",
            "</div>\n"
        );
        let content = format!(
            "<article class=\"thought\">\n{}{}{}</article>\n",
            self.post_header(post),
            self.post_frame(post, body),
            self.more_thoughts()
        );
        self.layout(&post.title, &content)
    }

    /// Standard not-found page
    pub fn not_found(&self) -> String {
        let content = format!(
            concat!(
                "<section class=\"not-found\">\n",
                "<div class=\"prompt\">$ cat thought.mdx</div>\n",
                "<h1>404</h1>\n",
                "<p>This page could not be found.</p>\n",
                "<p>{}</p>\n",
                "</section>\n"
            ),
            link_to(&self.thoughts_url(), "Back to all thoughts")
        );
        self.layout("Not found", &content)
    }

    fn post_header(&self, post: &PostRecord) -> String {
        let mut header = format!(
            "<p>{}</p>\n<header class=\"thought-header\">\n<h1>{}</h1>\n",
            link_to(&self.thoughts_url(), "← Back to all thoughts"),
            html_escape(&post.title)
        );

        if !post.description.is_empty() {
            let _ = writeln!(
                header,
                r#"<p class="description">{}</p>"#,
                html_escape(&post.description)
            );
        }

        header.push_str("<div class=\"meta\">");
        if let Some(date) = &post.published_at {
            header.push_str(&time_tag(date, &self.config.date_format));
        }
        let _ = writeln!(
            header,
            r#"<span class="reading-time">{}</span><span class="author">{}</span></div>"#,
            html_escape(&post.reading_time),
            html_escape(&post.author)
        );

        header.push_str(&tag_badges(&post.tags));

        if let Some(image) = &post.cover_image {
            let _ = writeln!(
                header,
                r#"<div class="cover"><img src="{}" alt="{}"></div>"#,
                html_escape(image),
                html_escape(&post.title)
            );
        }

        header.push_str("</header>\n");
        header
    }

    fn post_frame(&self, post: &PostRecord, body_html: &str) -> String {
        format!(
            concat!(
                "<div class=\"thought-frame\">\n",
                "<div class=\"frame-bar\"><span class=\"file\">{}</span></div>\n",
                "<div class=\"prose\">\n{}</div>\n",
                "</div>\n"
            ),
            html_escape(&post.identifier.file_name()),
            body_html
        )
    }

    fn post_footer(&self, post: &PostRecord) -> String {
        let studio = PostDefaults::STUDIO.author;
        let bio = if post.author == studio {
            format!(
                "The team at {} is passionate about building software that matters. \
                 We focus on craftsmanship, deep work, and thoughtful architecture.",
                studio
            )
        } else {
            format!("{} is a guest contributor to the {} blog.", post.author, studio)
        };

        let page_url = full_url_for(&self.config, &post_url(&self.config, post.identifier.as_str()));

        format!(
            concat!(
                "<div class=\"thought-footer\">\n",
                "<section class=\"about-author\"><h3>About the author</h3><p>{}</p></section>\n",
                "<section class=\"share\"><h3>Share this thought</h3><p>{} {}</p></section>\n",
                "</div>\n"
            ),
            html_escape(&bio),
            link_to(&twitter_share_url(&post.title, &page_url), "Twitter"),
            link_to(&linkedin_share_url(&page_url), "LinkedIn")
        )
    }

    fn more_thoughts(&self) -> String {
        format!(
            "<nav class=\"more-thoughts\"><h3>$ cat more_thoughts.txt</h3><p>{}</p></nav>\n",
            link_to(&self.thoughts_url(), "View all thoughts")
        )
    }

    fn thoughts_url(&self) -> String {
        url_for(&self.config, &self.config.thoughts_path())
    }

    fn layout(&self, title: &str, content: &str) -> String {
        let page_title = if title == self.config.title {
            html_escape(title)
        } else {
            format!(
                "{} | {}",
                html_escape(title),
                html_escape(&self.config.title)
            )
        };

        format!(
            concat!(
                "<!DOCTYPE html>\n",
                "<html lang=\"{}\">\n",
                "<head>\n",
                "<meta charset=\"utf-8\">\n",
                "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
                "<title>{}</title>\n",
                "<meta name=\"description\" content=\"{}\">\n",
                "</head>\n",
                "<body>\n",
                "<main class=\"thoughts\">\n{}</main>\n",
                "</body>\n",
                "</html>\n"
            ),
            html_escape(&self.config.language),
            page_title,
            html_escape(&self.config.description),
            content
        )
    }
}

fn tag_badges(tags: &[String]) -> String {
    if tags.is_empty() {
        return String::new();
    }

    let badges: String = tags
        .iter()
        .map(|tag| format!(r#"<span class="tag">{}</span>"#, html_escape(tag)))
        .collect();
    format!("<div class=\"tags\">{}</div>\n", badges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Slug;

    fn renderer() -> TemplateRenderer {
        TemplateRenderer::new(SiteConfig::default())
    }

    fn post(id: &str, source: &str) -> PostRecord {
        PostRecord::from_source(Slug::parse(id).unwrap(), source)
    }

    #[test]
    fn test_index_empty_state() {
        let html = renderer().index(&[]);
        assert!(html.contains(EMPTY_STATE_TITLE));
        assert!(!html.contains("thought-card"));
    }

    #[test]
    fn test_index_cards() {
        let posts = vec![
            post(
                "dated",
                "---\ntitle: Dated <one>\ndate: 2024-01-15\ntags: [rust, rust]\n---\n",
            ),
            post("undated", ""),
        ];
        let html = renderer().index(&posts);

        assert!(html.contains(r#"<a href="/thoughts/dated/" data-nav="internal">"#));
        assert!(html.contains(r#"<a href="/thoughts/undated/" data-nav="internal">"#));
        assert!(html.contains("Dated &lt;one&gt;"));
        assert!(html.contains(r#"<time datetime="2024-01-15T00:00:00.000Z">January 15, 2024</time>"#));
        assert_eq!(html.matches("<time").count(), 1);
        assert_eq!(html.matches(r#"<span class="tag">rust</span>"#).count(), 2);
        assert_eq!(html.matches("5 min read").count(), 2);
        assert!(!html.contains(EMPTY_STATE_TITLE));
    }

    #[test]
    fn test_post_page() {
        let record = post(
            "hello",
            "---\ntitle: Hello\ndescription: Greeting\nimage: /cover.png\n---\n",
        );
        let html = renderer().post(&record, "<p>BODY</p>");

        assert!(html.contains("<title>Hello | runtime.works</title>"));
        assert!(html.contains(r#"<p class="description">Greeting</p>"#));
        assert!(html.contains(r#"<img src="/cover.png" alt="Hello">"#));
        assert!(html.contains("<p>BODY</p>"));
        assert!(html.contains("hello.mdx"));
        assert!(html.contains("The team at runtime.works"));
        assert!(html.contains(
            "https://twitter.com/intent/tweet?text=Hello&amp;url=https%3A%2F%2Fruntime.works%2Fthoughts%2Fhello%2F"
        ));
        assert!(html.contains(r#"target="_blank" rel="noopener noreferrer">LinkedIn</a>"#));
    }

    #[test]
    fn test_post_page_guest_author_and_no_description() {
        let record = post("guest", "---\nauthor: Grace\n---\n");
        let html = renderer().post(&record, "");
        assert!(html.contains("Grace is a guest contributor to the runtime.works blog."));
        assert!(!html.contains(r#"class="description""#));
        assert!(!html.contains(r#"class="cover""#));
    }

    #[test]
    fn test_default_author_gets_studio_bio_whatever_the_config_says() {
        let config: SiteConfig =
            serde_yaml::from_str("title: Another Studio\nauthor: Someone Else\n").unwrap();
        let record = post("team", "---\ntitle: Team\n---\n");
        let html = TemplateRenderer::new(config).post(&record, "");
        assert!(html.contains("The team at runtime.works"));
        assert!(!html.contains("guest contributor"));
    }

    #[test]
    fn test_not_found_and_unavailable() {
        let html = renderer().not_found();
        assert!(html.contains("404"));
        assert!(html.contains(r#"href="/thoughts/""#));

        let record = post("broken", "---\ntitle: Broken\n---\n<Aside>\n");
        let html = renderer().unavailable(&record);
        assert!(html.contains("Content unavailable"));
        assert!(html.contains("Broken"));
    }
}
