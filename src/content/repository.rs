//! Query layer over the content directory

use anyhow::Result;
use std::collections::BTreeSet;

use super::access::{categories_for_role, is_accessible};
use super::display::PREDEFINED_CATEGORIES;
use super::loader::ContentLoader;
use super::post::Post;

/// Read-only, query-shaped access to the article corpus.
///
/// Nothing is cached: every call re-reads the content directory, so callers
/// may share a repository across threads freely.
#[derive(Debug, Clone)]
pub struct ContentRepository {
    loader: ContentLoader,
}

impl ContentRepository {
    pub fn new(loader: ContentLoader) -> Self {
        Self { loader }
    }

    /// All articles, newest first. With a role, only the articles that role
    /// may see.
    pub fn all_posts(&self, role: Option<&str>) -> Result<Vec<Post>> {
        let posts = self.loader.load_posts()?;
        Ok(match role {
            Some(role) => posts
                .into_iter()
                .filter(|p| is_accessible(p, role))
                .collect(),
            None => posts,
        })
    }

    /// One article by slug. An article hidden from `role` is reported the
    /// same way as a missing one.
    pub fn post_by_slug(&self, slug: &str, role: Option<&str>) -> Option<Post> {
        let post = self.loader.load_post(slug)?;
        match role {
            Some(role) if !is_accessible(&post, role) => {
                tracing::debug!("Post {:?} hidden from role {:?}", slug, role);
                None
            }
            _ => Some(post),
        }
    }

    /// Predefined categories plus every category used by an article, sorted
    pub fn all_categories(&self) -> Result<Vec<String>> {
        let mut categories: BTreeSet<String> = PREDEFINED_CATEGORIES
            .iter()
            .map(|c| c.to_string())
            .collect();

        for post in self.loader.load_posts()? {
            categories.extend(post.categories);
        }

        Ok(categories.into_iter().collect())
    }

    /// Every distinct audience used by an article, sorted
    pub fn all_audiences(&self) -> Result<Vec<String>> {
        let audiences: BTreeSet<String> = self
            .loader
            .load_posts()?
            .into_iter()
            .map(|p| p.audience.as_str().to_string())
            .collect();

        Ok(audiences.into_iter().collect())
    }

    pub fn posts_by_category(&self, category: &str) -> Result<Vec<Post>> {
        Ok(self
            .loader
            .load_posts()?
            .into_iter()
            .filter(|p| p.has_category(category))
            .collect())
    }

    pub fn posts_by_audience(&self, audience: &str) -> Result<Vec<Post>> {
        Ok(self
            .loader
            .load_posts()?
            .into_iter()
            .filter(|p| p.audience.as_str() == audience)
            .collect())
    }

    pub fn featured_posts(&self) -> Result<Vec<Post>> {
        Ok(self
            .loader
            .load_posts()?
            .into_iter()
            .filter(|p| p.featured)
            .collect())
    }

    /// Legacy filter: articles tagged with any category the role maps to
    pub fn posts_for_role_categories(&self, role: &str) -> Result<Vec<Post>> {
        let wanted = categories_for_role(role);
        Ok(self
            .loader
            .load_posts()?
            .into_iter()
            .filter(|p| wanted.iter().any(|c| p.has_category(c)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Tz;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn article(dir: &Path, slug: &str, front_matter: &str) {
        let text = format!("---\n{}\n---\n\nBody of {}.\n", front_matter.trim(), slug);
        fs::write(dir.join(format!("{slug}.mdx")), text).unwrap();
    }

    fn repo(dir: &Path) -> ContentRepository {
        ContentRepository::new(ContentLoader::new(dir, "mdx", Tz::UTC))
    }

    fn slugs(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.slug.as_str()).collect()
    }

    /// Three articles for three audiences
    fn fixture() -> TempDir {
        let tmp = TempDir::new().unwrap();
        article(
            tmp.path(),
            "a",
            "title: A\naudience: LAWYER\npubDate: 2024-01-01\ncategories: legal-education, lawyer",
        );
        article(
            tmp.path(),
            "b",
            "title: B\naudience: GENERAL\npubDate: 2024-06-01\ncategories: general\nfeatured: true",
        );
        article(
            tmp.path(),
            "c",
            "title: C\naudience: BUYER\npubDate: 2024-03-01\ncategories: zoning/permits, buyer",
        );
        tmp
    }

    #[test]
    fn test_role_listing_uses_general_fallback() {
        let tmp = fixture();
        let posts = repo(tmp.path()).all_posts(Some("LAWYER")).unwrap();
        assert_eq!(slugs(&posts), vec!["b", "a"]);
    }

    #[test]
    fn test_listing_without_role_returns_everything_sorted() {
        let tmp = fixture();
        let posts = repo(tmp.path()).all_posts(None).unwrap();
        assert_eq!(slugs(&posts), vec!["b", "c", "a"]);
        for pair in posts.windows(2) {
            assert!(pair[0].pub_date >= pair[1].pub_date);
        }
    }

    #[test]
    fn test_every_role_only_sees_accessible_posts() {
        let tmp = fixture();
        let repo = repo(tmp.path());
        for role in ["BUYER", "ACCOUNTANT", "DEVELOPER", "LAWYER", "GENERAL", "NOBODY"] {
            let posts = repo.all_posts(Some(role)).unwrap();
            assert!(posts.iter().all(|p| is_accessible(p, role)));
            assert!(posts.iter().any(|p| p.slug == "b"), "role {role}");
        }
    }

    #[test]
    fn test_post_by_slug_respects_role() {
        let tmp = fixture();
        let repo = repo(tmp.path());
        assert_eq!(repo.post_by_slug("a", None).unwrap().slug, "a");
        assert_eq!(repo.post_by_slug("a", Some("LAWYER")).unwrap().slug, "a");
        assert!(repo.post_by_slug("a", Some("BUYER")).is_none());
        assert_eq!(repo.post_by_slug("b", Some("BUYER")).unwrap().slug, "b");
        assert!(repo.post_by_slug("missing", None).is_none());
    }

    #[test]
    fn test_all_categories_is_superset_of_predefined() {
        let tmp = fixture();
        let categories = repo(tmp.path()).all_categories().unwrap();
        for predefined in PREDEFINED_CATEGORIES {
            assert!(categories.iter().any(|c| c == predefined));
        }
        assert!(categories.contains(&"zoning/permits".to_string()));
        assert!(categories.contains(&"buyer".to_string()));
        let mut sorted = categories.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(categories, sorted);
    }

    #[test]
    fn test_all_categories_without_content() {
        let tmp = TempDir::new().unwrap();
        let categories = repo(&tmp.path().join("missing")).all_categories().unwrap();
        assert_eq!(categories.len(), PREDEFINED_CATEGORIES.len());
    }

    #[test]
    fn test_all_audiences_is_exactly_what_is_used() {
        let tmp = fixture();
        article(tmp.path(), "d", "title: D\naudience: LAWYER");
        article(tmp.path(), "e", "title: E\naudience: INVESTOR");
        let audiences = repo(tmp.path()).all_audiences().unwrap();
        assert_eq!(audiences, vec!["BUYER", "GENERAL", "INVESTOR", "LAWYER"]);
    }

    #[test]
    fn test_filters() {
        let tmp = fixture();
        let repo = repo(tmp.path());
        assert_eq!(slugs(&repo.posts_by_category("buyer").unwrap()), vec!["c"]);
        assert!(repo.posts_by_category("Buyer").unwrap().is_empty());
        assert_eq!(slugs(&repo.posts_by_audience("LAWYER").unwrap()), vec!["a"]);
        assert_eq!(slugs(&repo.featured_posts().unwrap()), vec!["b"]);
    }

    #[test]
    fn test_featured_is_subset_of_all() {
        let tmp = fixture();
        let repo = repo(tmp.path());
        let all = repo.all_posts(None).unwrap();
        let expected: Vec<_> = all.iter().filter(|p| p.featured).map(|p| p.slug.clone()).collect();
        let featured: Vec<_> = repo.featured_posts().unwrap().into_iter().map(|p| p.slug).collect();
        assert_eq!(featured, expected);
    }

    #[test]
    fn test_legacy_role_categories() {
        let tmp = fixture();
        let repo = repo(tmp.path());
        assert_eq!(slugs(&repo.posts_for_role_categories("BUYER").unwrap()), vec!["b", "c"]);
        assert_eq!(slugs(&repo.posts_for_role_categories("UNKNOWN").unwrap()), vec!["b"]);
    }

    #[test]
    fn test_one_bad_file_does_not_hide_others() {
        let tmp = fixture();
        fs::write(tmp.path().join("bad.mdx"), "---\ntitle: never closed\n").unwrap();
        let posts = repo(tmp.path()).all_posts(None).unwrap();
        assert_eq!(slugs(&posts), vec!["b", "c", "a"]);
    }
}
