//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Content directory, relative to the site base directory
pub const CONTENT_DIR: &str = "content/posts";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub tagline: String,
    pub description: String,
    pub language: String,
    pub contact_email: String,

    // URL
    pub url: String,
    pub root: String,
    pub thoughts_dir: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,

    // Date format (chrono syntax)
    pub date_format: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "runtime.works".to_string(),
            tagline: "Thoughts & Ideas".to_string(),
            description: "A place for deep dives into software craft, thinking about systems, and building things that matter.".to_string(),
            language: "en".to_string(),
            contact_email: "init@runtime.works".to_string(),

            url: "https://runtime.works".to_string(),
            root: "/".to_string(),
            thoughts_dir: "thoughts".to_string(),

            content_dir: CONTENT_DIR.to_string(),
            public_dir: "public".to_string(),

            date_format: "%B %-d, %Y".to_string(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Site-relative path of the thoughts listing, e.g. `/thoughts/`
    pub fn thoughts_path(&self) -> String {
        format!("/{}/", self.thoughts_dir.trim_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "runtime.works");
        assert_eq!(config.content_dir, CONTENT_DIR);
        assert_eq!(config.thoughts_path(), "/thoughts/");
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Studio
tagline: Notes
content_dir: posts
extra_key: 3
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Studio");
        assert_eq!(config.tagline, "Notes");
        assert_eq!(config.content_dir, "posts");
        assert_eq!(config.public_dir, "public");
        assert!(config.extra.contains_key("extra_key"));
    }
}
