//! Post model

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

use super::FrontMatter;

/// File extension of content documents
pub const CONTENT_EXTENSION: &str = "mdx";

/// Defaults applied to every field the front-matter leaves out
#[derive(Debug, Clone, Copy)]
pub struct PostDefaults {
    pub title: &'static str,
    pub description: &'static str,
    pub author: &'static str,
    pub reading_time: &'static str,
}

impl PostDefaults {
    pub const STUDIO: PostDefaults = PostDefaults {
        title: "Untitled",
        description: "",
        author: "runtime.works",
        reading_time: "5 min read",
    };
}

/// Identifier of a thought, derived from its file name.
///
/// Never empty, never `.` or `..`, and free of path separators and NUL,
/// so joining it onto the content directory cannot leave that directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slug(String);

impl Slug {
    /// Validate a candidate identifier
    pub fn parse(s: &str) -> Option<Self> {
        let valid = !s.is_empty()
            && s != "."
            && s != ".."
            && !s.contains(['/', '\\', '\0']);
        valid.then(|| Slug(s.to_string()))
    }

    /// Derive the identifier from a content file name such as `hello.mdx`
    pub fn from_file_name(name: &str) -> Option<Self> {
        let stem = name.strip_suffix(CONTENT_EXTENSION)?.strip_suffix('.')?;
        Self::parse(stem)
    }

    /// File name this identifier is stored under
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.0, CONTENT_EXTENSION)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for Slug {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Serialize for Slug {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// A thought: metadata plus the raw MDX body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    /// File name without extension
    pub identifier: Slug,

    pub title: String,

    pub description: String,

    /// Publication instant, `None` when the document carries no usable date
    pub published_at: Option<DateTime<Utc>>,

    pub author: String,

    /// Tags in declaration order, duplicates preserved
    pub tags: Vec<String>,

    /// Reading time label, e.g. "5 min read"
    pub reading_time: String,

    /// Cover image URL or path
    pub cover_image: Option<String>,

    /// Raw MDX after the front-matter block
    #[serde(skip_serializing)]
    pub body: String,
}

impl PostRecord {
    /// Build a record from parsed front-matter and body
    pub fn from_parts(identifier: Slug, fm: FrontMatter, body: &str) -> Self {
        Self::with_defaults(identifier, fm, body, &PostDefaults::STUDIO)
    }

    pub fn with_defaults(
        identifier: Slug,
        fm: FrontMatter,
        body: &str,
        defaults: &PostDefaults,
    ) -> Self {
        let published_at = fm.parse_date();
        Self {
            identifier,
            title: fm.title.unwrap_or_else(|| defaults.title.to_string()),
            description: fm
                .description
                .unwrap_or_else(|| defaults.description.to_string()),
            published_at,
            author: fm.author.unwrap_or_else(|| defaults.author.to_string()),
            tags: fm.tags,
            reading_time: fm
                .reading_time
                .unwrap_or_else(|| defaults.reading_time.to_string()),
            cover_image: fm.image,
            body: body.to_string(),
        }
    }

    /// Parse a whole document (front-matter and body)
    pub fn from_source(identifier: Slug, source: &str) -> Self {
        let (fm, body) = FrontMatter::parse(source);
        Self::from_parts(identifier, fm, body)
    }

    /// Newest first; undated records sort after every dated one
    pub fn newest_first(a: &PostRecord, b: &PostRecord) -> Ordering {
        match (&a.published_at, &b.published_at) {
            (Some(a), Some(b)) => b.cmp(a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slug(s: &str) -> Slug {
        Slug::parse(s).unwrap()
    }

    #[test]
    fn test_slug_validation() {
        assert!(Slug::parse("hello-world").is_some());
        assert!(Slug::parse("Hello.World").is_some());
        assert!(Slug::parse("").is_none());
        assert!(Slug::parse(".").is_none());
        assert!(Slug::parse("..").is_none());
        assert!(Slug::parse("../secret").is_none());
        assert!(Slug::parse("a/b").is_none());
        assert!(Slug::parse("a\\b").is_none());
        assert!(Slug::parse("a\0b").is_none());
    }

    #[test]
    fn test_slug_from_file_name() {
        assert_eq!(Slug::from_file_name("post.mdx").unwrap(), "post");
        assert_eq!(Slug::from_file_name("v1.2.mdx").unwrap(), "v1.2");
        assert!(Slug::from_file_name(".mdx").is_none());
        assert!(Slug::from_file_name("notes.md").is_none());
        assert!(Slug::from_file_name("mdx").is_none());
        assert_eq!(slug("post").file_name(), "post.mdx");
    }

    #[test]
    fn test_defaults_without_frontmatter() {
        let post = PostRecord::from_source(slug("bare"), "Just text.");
        assert_eq!(post.identifier, "bare");
        assert_eq!(post.title, "Untitled");
        assert_eq!(post.description, "");
        assert_eq!(post.author, "runtime.works");
        assert!(post.tags.is_empty());
        assert_eq!(post.reading_time, "5 min read");
        assert!(post.published_at.is_none());
        assert!(post.cover_image.is_none());
        assert_eq!(post.body, "Just text.");
    }

    #[test]
    fn test_frontmatter_overrides_defaults() {
        let source = "---\ntitle: Hello\ntags: [a, b, a]\ndate: 2024-03-01\nimage: /c.png\n---\nBody";
        let post = PostRecord::from_source(slug("hello"), source);
        assert_eq!(post.title, "Hello");
        assert_eq!(post.tags, vec!["a", "b", "a"]);
        assert_eq!(
            post.published_at.unwrap().to_rfc3339(),
            "2024-03-01T00:00:00+00:00"
        );
        assert_eq!(post.cover_image.as_deref(), Some("/c.png"));
        assert_eq!(post.body, "Body");
    }

    #[test]
    fn test_newest_first_puts_undated_last() {
        let dated_old = PostRecord::from_source(slug("old"), "---\ndate: 2020-01-01\n---\n");
        let dated_new = PostRecord::from_source(slug("new"), "---\ndate: 2024-01-01\n---\n");
        let undated_a = PostRecord::from_source(slug("a"), "");
        let undated_b = PostRecord::from_source(slug("b"), "");

        let mut posts = vec![undated_a, dated_old, undated_b, dated_new];
        posts.sort_by(PostRecord::newest_first);

        let order: Vec<_> = posts.iter().map(|p| p.identifier.as_str()).collect();
        assert_eq!(order, vec!["new", "old", "a", "b"]);
    }

    #[test]
    fn test_serialize_skips_body() {
        let post = PostRecord::from_source(slug("x"), "---\nreadingTime: 2 min\n---\nsecret body");
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["identifier"], "x");
        assert_eq!(json["readingTime"], "2 min");
        assert!(json.get("body").is_none());
    }
}
