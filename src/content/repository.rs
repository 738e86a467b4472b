//! Post repository - reads thoughts from the content directory

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{ContentError, PostRecord, Slug};

/// Reads `.mdx` documents from a flat content directory.
///
/// Holds nothing but the directory path; every call reads the files again
/// and builds fresh records.
#[derive(Debug, Clone)]
pub struct PostRepository {
    content_dir: PathBuf,
}

impl PostRepository {
    /// Create a repository over a content directory
    pub fn new<P: Into<PathBuf>>(content_dir: P) -> Self {
        Self {
            content_dir: content_dir.into(),
        }
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Load every thought, newest first.
    ///
    /// A missing content directory is created and yields an empty list.
    /// Undated thoughts come last, in file-name order.
    pub fn list(&self) -> Result<Vec<PostRecord>, ContentError> {
        if !self.content_dir.exists() {
            fs::create_dir_all(&self.content_dir)
                .map_err(|e| ContentError::storage(&self.content_dir, e))?;
            tracing::info!("Created content directory {:?}", self.content_dir);
            return Ok(Vec::new());
        }

        if !self.content_dir.is_dir() {
            return Err(ContentError::storage(
                &self.content_dir,
                std::io::Error::other("content path is not a directory"),
            ));
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(&self.content_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.content_dir.clone());
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                ContentError::storage(path, source)
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(name) = entry.file_name().to_str() else {
                tracing::warn!("Skipping non UTF-8 file name {:?}", entry.path());
                continue;
            };

            if !name.ends_with(".mdx") {
                continue;
            }

            let Some(slug) = Slug::from_file_name(name) else {
                tracing::warn!("Skipping {:?}: no usable identifier", entry.path());
                continue;
            };

            posts.push(self.load(slug, entry.path())?);
        }

        posts.sort_by(PostRecord::newest_first);

        tracing::debug!("Listed {} thoughts from {:?}", posts.len(), self.content_dir);
        Ok(posts)
    }

    /// Look up a single thought.
    ///
    /// Returns `Ok(None)` when no document has this identifier, including
    /// identifiers that could not name a file inside the content directory.
    pub fn get(&self, id: &str) -> Result<Option<PostRecord>, ContentError> {
        let Some(slug) = Slug::parse(id) else {
            tracing::debug!("Rejected identifier {:?}", id);
            return Ok(None);
        };

        let path = self.content_dir.join(slug.file_name());
        match fs::read_to_string(&path) {
            Ok(source) => Ok(Some(PostRecord::from_source(slug, &source))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            // Subdirectories are never documents
            Err(_) if path.is_dir() => Ok(None),
            Err(e) => Err(ContentError::storage(path, e)),
        }
    }

    fn load(&self, slug: Slug, path: &Path) -> Result<PostRecord, ContentError> {
        let source = fs::read_to_string(path).map_err(|e| ContentError::storage(path, e))?;
        Ok(PostRecord::from_source(slug, &source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn ids(posts: &[PostRecord]) -> Vec<&str> {
        posts.iter().map(|p| p.identifier.as_str()).collect()
    }

    #[test]
    fn test_list_sorts_newest_first_and_undated_last() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "b-undated.mdx", "No front matter");
        write(tmp.path(), "old.mdx", "---\ndate: 2021-05-01\n---\n");
        write(tmp.path(), "a-undated.mdx", "---\ntitle: Draft\n---\n");
        write(tmp.path(), "new.mdx", "---\ndate: 2024-02-10\n---\n");

        let repo = PostRepository::new(tmp.path());
        let posts = repo.list().unwrap();
        assert_eq!(ids(&posts), vec!["new", "old", "a-undated", "b-undated"]);
    }

    #[test]
    fn test_list_ignores_other_entries() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "post.mdx", "---\ntitle: Post\n---\n");
        write(tmp.path(), "notes.md", "not a thought");
        write(tmp.path(), "README", "nope");
        fs::create_dir(tmp.path().join("nested.mdx")).unwrap();
        fs::create_dir(tmp.path().join("drafts")).unwrap();
        write(&tmp.path().join("drafts"), "hidden.mdx", "deep");

        let posts = PostRepository::new(tmp.path()).list().unwrap();
        assert_eq!(ids(&posts), vec!["post"]);
    }

    #[test]
    fn test_get_directory_is_none() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("nested.mdx")).unwrap();

        let repo = PostRepository::new(tmp.path());
        assert!(repo.list().unwrap().is_empty());
        assert!(repo.get("nested").unwrap().is_none());
    }

    #[test]
    fn test_invalid_utf8_is_storage_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("binary.mdx"), [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let repo = PostRepository::new(tmp.path());
        assert!(matches!(
            repo.get("binary"),
            Err(ContentError::Storage { .. })
        ));
        assert!(matches!(repo.list(), Err(ContentError::Storage { .. })));
    }

    #[test]
    fn test_content_path_that_is_a_file_is_storage_error() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("posts");
        write(tmp.path(), "posts", "not a directory");

        let repo = PostRepository::new(&file);
        assert!(matches!(repo.list(), Err(ContentError::Storage { .. })));
        assert!(matches!(
            repo.get("hello"),
            Err(ContentError::Storage { .. })
        ));
    }

    #[test]
    fn test_list_bootstraps_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("content").join("posts");
        let repo = PostRepository::new(&dir);

        assert!(repo.list().unwrap().is_empty());
        assert!(dir.is_dir());
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_get_returns_full_record() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "hello.mdx",
            "---\ntitle: Hello\ntags: [a, b, a]\n---\n# Body\n",
        );

        let post = PostRepository::new(tmp.path()).get("hello").unwrap().unwrap();
        assert_eq!(post.identifier, "hello");
        assert_eq!(post.title, "Hello");
        assert_eq!(post.tags, vec!["a", "b", "a"]);
        assert_eq!(post.body, "# Body\n");
    }

    #[test]
    fn test_get_missing_is_none() {
        let tmp = TempDir::new().unwrap();
        let repo = PostRepository::new(tmp.path());
        assert!(repo.get("does-not-exist").unwrap().is_none());
    }

    #[test]
    fn test_get_rejects_traversal() {
        let tmp = TempDir::new().unwrap();
        let content = tmp.path().join("posts");
        fs::create_dir(&content).unwrap();
        write(tmp.path(), "secret.mdx", "---\ntitle: Secret\n---\n");

        let repo = PostRepository::new(&content);
        assert!(repo.get("../secret").unwrap().is_none());
        assert!(repo.get("..").unwrap().is_none());
        assert!(repo.get("").unwrap().is_none());
    }

    #[test]
    fn test_list_extension_is_case_sensitive() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "upper.MDX", "x");
        let repo = PostRepository::new(tmp.path());
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_listing_round_trips_through_get() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "one.mdx", "---\ndate: 2023-01-01\n---\n");
        write(tmp.path(), "two.mdx", "");
        write(tmp.path(), "three.v2.mdx", "---\ntitle: [broken\n---\n");

        let repo = PostRepository::new(tmp.path());
        let posts = repo.list().unwrap();
        assert_eq!(posts.len(), 3);
        for post in posts {
            let found = repo.get(post.identifier.as_str()).unwrap();
            assert_eq!(found.unwrap().identifier, post.identifier);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_is_storage_error() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("locked.mdx");
        write(tmp.path(), "locked.mdx", "x");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores permission bits
        if fs::read_to_string(&path).is_ok() {
            return;
        }

        let repo = PostRepository::new(tmp.path());
        assert!(matches!(
            repo.get("locked"),
            Err(ContentError::Storage { .. })
        ));
        assert!(matches!(repo.list(), Err(ContentError::Storage { .. })));
    }
}
