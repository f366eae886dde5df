//! Content loader - reads articles from the content directory

use anyhow::{Context, Result};
use chrono_tz::Tz;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::post::{Audience, Post, UNDEFINED_PLACEHOLDER};
use super::{DocumentError, FrontMatter};
use crate::Site;

/// Loads articles from disk. Holds no state besides its settings, so every
/// call sees the directory as it is right now.
#[derive(Debug, Clone)]
pub struct ContentLoader {
    content_dir: PathBuf,
    extension: String,
    tz: Tz,
}

impl ContentLoader {
    /// Create a loader for an explicit directory
    pub fn new<P: Into<PathBuf>>(content_dir: P, extension: &str, tz: Tz) -> Self {
        Self {
            content_dir: content_dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
            tz,
        }
    }

    /// Create a loader from the site configuration
    pub fn for_site(site: &Site) -> Result<Self> {
        Ok(Self::new(
            site.content_dir.clone(),
            &site.config.extension,
            site.config.tz()?,
        ))
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Load every article, newest first.
    ///
    /// A missing directory yields an empty list. Articles that fail to parse
    /// are logged and left out.
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        if !self.content_dir.exists() {
            tracing::warn!("Content directory not found: {:?}", self.content_dir);
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(&self.content_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(e).with_context(|| {
                        format!("Failed to read content directory {:?}", self.content_dir)
                    });
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() || !self.is_article(path) {
                continue;
            }

            match self.load_file(path) {
                Ok(post) => posts.push(post),
                Err(e) => {
                    tracing::error!("Error reading file {:?}: {}", path, e);
                }
            }
        }

        // Sort by date descending (newest first); undated articles go last
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));

        tracing::debug!("Loaded {} posts from {:?}", posts.len(), self.content_dir);

        Ok(posts)
    }

    /// Load one article by slug. Missing, unreadable and malformed files are
    /// all reported as `None`.
    pub fn load_post(&self, slug: &str) -> Option<Post> {
        if !is_valid_slug(slug) {
            tracing::debug!("Rejected slug {:?}", slug);
            return None;
        }

        if !self.content_dir.exists() {
            tracing::warn!("Content directory not found: {:?}", self.content_dir);
            return None;
        }

        let path = self.path_for(slug);
        match self.load_file(&path) {
            Ok(post) => Some(post),
            Err(DocumentError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No post for slug {:?}", slug);
                None
            }
            Err(e) => {
                tracing::error!("Error loading post {:?}: {}", path, e);
                None
            }
        }
    }

    /// Path where the article with `slug` lives
    pub fn path_for(&self, slug: &str) -> PathBuf {
        self.content_dir.join(format!("{}.{}", slug, self.extension))
    }

    /// Read and parse a single article file
    fn load_file(&self, path: &Path) -> Result<Post, DocumentError> {
        let text = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        let mut post = self.parse_post(&slug, &text)?;
        post.full_source = path.to_path_buf();
        Ok(post)
    }

    /// Turn raw document text into a normalized post
    pub fn parse_post(&self, slug: &str, text: &str) -> Result<Post, DocumentError> {
        let (fm, body) = FrontMatter::parse(text)?;

        let pub_date = fm.parse_pub_date(&self.tz);
        if pub_date.is_none() {
            if let Some(raw) = &fm.pub_date {
                tracing::warn!("Unparseable pubDate {:?} in {}", raw, slug);
            }
        }

        let title = fm
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| slug.to_string());

        let hero_image = fm
            .hero_image
            .filter(|h| !h.trim().is_empty() && h != UNDEFINED_PLACEHOLDER);

        let mut post = Post::new(slug.to_string(), title);
        post.description = fm.description.unwrap_or_default();
        post.pub_date = pub_date;
        post.hero_image = hero_image;
        post.content = body.to_string();
        post.categories = fm.categories;
        post.audience = Audience::from_front_matter(fm.audience.as_deref());
        post.featured = fm.featured;
        post.extra = fm.extra;

        Ok(post)
    }

    /// Check if a file has the article extension
    fn is_article(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e == self.extension)
            .unwrap_or(false)
    }
}

/// Slugs are plain file stems; anything that could leave the content
/// directory is refused
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && !slug.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn loader(dir: &Path) -> ContentLoader {
        ContentLoader::new(dir, "mdx", Tz::UTC)
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let tmp = TempDir::new().unwrap();
        let loader = loader(&tmp.path().join("nope"));
        assert!(loader.load_posts().unwrap().is_empty());
        assert!(loader.load_post("anything").is_none());
    }

    #[test]
    fn test_only_article_extension_is_loaded() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "one.mdx", "---\ntitle: One\n---\nBody");
        write(tmp.path(), "notes.md", "---\ntitle: Notes\n---\nBody");
        write(tmp.path(), "image.png", "not text");
        fs::create_dir(tmp.path().join("drafts.mdx")).unwrap();

        let posts = loader(tmp.path()).load_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "one");
        assert_eq!(posts[0].title, "One");
    }

    #[test]
    fn test_malformed_file_is_skipped() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "good.mdx", "---\ntitle: Good\npubDate: 2024-01-01\n---\nBody");
        write(tmp.path(), "truncated.mdx", "---\ntitle: Truncated\n");
        write(tmp.path(), "broken.mdx", "---\ntitle: [oops\n---\n");

        let loader = loader(tmp.path());
        let posts = loader.load_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "good");
        assert!(loader.load_post("truncated").is_none());
        assert!(loader.load_post("broken").is_none());
    }

    #[test]
    fn test_non_scalar_fields_still_returned() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "ok.mdx", "---\ntitle: Ok\npubDate: 2024-01-01\n---\n");
        write(
            tmp.path(),
            "listy.mdx",
            "---\ntitle:\n  - Part one\n  - Part two\ndescription:\n  x: 1\nfeatured: 1.0\n---\nBody",
        );

        let loader = loader(tmp.path());
        let posts = loader.load_posts().unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["ok", "listy"]);

        let post = loader.load_post("listy").unwrap();
        assert_eq!(post.title, "listy");
        assert_eq!(post.description, "");
        assert_eq!(post.pub_date, None);
        assert!(post.featured);
        assert_eq!(post.audience, Audience::General);
    }

    #[test]
    fn test_normalization_defaults() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "bare.mdx",
            "---\naudience: \"undefined\"\nheroImage: \"undefined\"\npubDate: someday\n---\nText",
        );

        let post = loader(tmp.path()).load_post("bare").unwrap();
        assert_eq!(post.title, "bare");
        assert_eq!(post.description, "");
        assert_eq!(post.audience, Audience::General);
        assert_eq!(post.hero_image, None);
        assert_eq!(post.pub_date, None);
        assert!(post.categories.is_empty());
        assert!(!post.featured);
        assert_eq!(post.content, "Text");
        assert_eq!(post.full_source, tmp.path().join("bare.mdx"));
    }

    #[test]
    fn test_sorted_newest_first_with_undated_last() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "old.mdx", "---\npubDate: 2023-05-01\n---\n");
        write(tmp.path(), "undated.mdx", "---\ntitle: Undated\n---\n");
        write(tmp.path(), "new.mdx", "---\npubDate: 2024-05-01\n---\n");

        let posts = loader(tmp.path()).load_posts().unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "old", "undated"]);
    }

    #[test]
    fn test_slug_traversal_rejected() {
        let tmp = TempDir::new().unwrap();
        let content = tmp.path().join("posts");
        fs::create_dir(&content).unwrap();
        write(tmp.path(), "secret.mdx", "---\ntitle: Secret\n---\n");

        let loader = loader(&content);
        assert!(loader.load_post("../secret").is_none());
        assert!(loader.load_post("").is_none());
        assert!(loader.load_post(".hidden").is_none());
    }
}
