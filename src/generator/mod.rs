//! Generator module - writes the Thoughts pages as static HTML

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::content::{render_body, ContentError, PostRecord};
use crate::templates::TemplateRenderer;
use crate::Site;

/// Outcome of a generation run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    /// Detail pages written with their rendered body
    pub rendered: usize,
    /// Detail pages written as "content unavailable"
    pub unavailable: Vec<String>,
}

/// Static site generator for the Thoughts section
pub struct Generator {
    site: Site,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Self {
        Self {
            site: site.clone(),
            renderer: TemplateRenderer::new(site.config.clone()),
        }
    }

    /// Generate the list page, one page per thought, and the 404 page
    pub fn generate(&self, posts: &[PostRecord]) -> Result<GenerateReport> {
        fs::create_dir_all(&self.site.public_dir)?;

        let thoughts_dir = self
            .site
            .public_dir
            .join(self.site.config.thoughts_dir.trim_matches('/'));

        write_page(&thoughts_dir.join("index.html"), &self.renderer.index(posts))?;

        let mut report = GenerateReport::default();
        for post in posts {
            let html = match render_body(&post.body) {
                Ok(body) => {
                    report.rendered += 1;
                    self.renderer.post(post, &body)
                }
                Err(ContentError::MalformedBody { line, message }) => {
                    tracing::warn!(
                        "Thought {:?} has a malformed body (line {}): {}",
                        post.identifier.as_str(),
                        line,
                        message
                    );
                    report.unavailable.push(post.identifier.to_string());
                    self.renderer.unavailable(post)
                }
                Err(e) => return Err(e.into()),
            };

            let output_path = thoughts_dir
                .join(post.identifier.as_str())
                .join("index.html");
            write_page(&output_path, &html)?;
            tracing::debug!("Generated thought: {:?}", output_path);
        }

        write_page(
            &self.site.public_dir.join("404.html"),
            &self.renderer.not_found(),
        )?;

        Ok(report)
    }
}

fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
    }
    fs::write(path, html).map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    #[test]
    fn test_generate_pages() {
        let tmp = TempDir::new().unwrap();
        let site = Site::with_config(tmp.path().to_path_buf(), SiteConfig::default());
        fs::create_dir_all(&site.content_dir).unwrap();
        fs::write(
            site.content_dir.join("good.mdx"),
            "---\ntitle: Good\ndate: 2024-01-01\n---\n# Hi\n",
        )
        .unwrap();
        fs::write(site.content_dir.join("bad.mdx"), "---\ntitle: Bad\n---\n<Aside>\n").unwrap();

        let posts = site.repository().list().unwrap();
        let report = Generator::new(&site).generate(&posts).unwrap();

        assert_eq!(report.rendered, 1);
        assert_eq!(report.unavailable, vec!["bad".to_string()]);

        let thoughts = site.public_dir.join("thoughts");
        let index = fs::read_to_string(thoughts.join("index.html")).unwrap();
        assert!(index.contains("/thoughts/good/"));
        assert!(index.contains("/thoughts/bad/"));

        let good = fs::read_to_string(thoughts.join("good").join("index.html")).unwrap();
        assert!(good.contains(r#"<h1 class="prose-h1">Hi</h1>"#));

        let bad = fs::read_to_string(thoughts.join("bad").join("index.html")).unwrap();
        assert!(bad.contains("Content unavailable"));

        assert!(site.public_dir.join("404.html").exists());
    }

    #[test]
    fn test_generate_empty_site() {
        let tmp = TempDir::new().unwrap();
        let site = Site::with_config(tmp.path().to_path_buf(), SiteConfig::default());

        let posts = site.repository().list().unwrap();
        let report = Generator::new(&site).generate(&posts).unwrap();

        assert_eq!(report, GenerateReport::default());
        let index = fs::read_to_string(site.public_dir.join("thoughts").join("index.html")).unwrap();
        assert!(index.contains(crate::templates::EMPTY_STATE_TITLE));
    }
}
