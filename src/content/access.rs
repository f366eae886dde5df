//! Audience-based visibility rules

use lazy_static::lazy_static;
use std::collections::HashMap;

use super::post::{Audience, Post, UNDEFINED_PLACEHOLDER};

lazy_static! {
    /// Legacy role to category mapping, kept for pages that still filter by
    /// category instead of audience
    static ref ROLE_TO_CATEGORIES: HashMap<&'static str, &'static [&'static str]> = {
        let mut m: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        m.insert("BUYER", &["general", "buyer"]);
        m.insert("ACCOUNTANT", &["general", "accountant"]);
        m.insert("DEVELOPER", &["general", "developer"]);
        m.insert("LAWYER", &["general", "lawyer"]);
        m.insert("EXISTING_PROPERTY_OWNER", &["general", "property-owner"]);
        m.insert("GENERAL", &["general"]);
        m
    };
}

const DEFAULT_ROLE_CATEGORIES: &[&str] = &["general"];

/// Whether `role` may see `post`.
///
/// Posts without an audience are visible to everyone. Otherwise the audience
/// must equal the role exactly, or be `GENERAL`.
pub fn is_accessible(post: &Post, role: &str) -> bool {
    match &post.audience {
        Audience::General => true,
        Audience::Other(raw) if raw.trim().is_empty() || raw == UNDEFINED_PLACEHOLDER => true,
        audience => audience.as_str() == role,
    }
}

/// Categories a role used to be mapped to
pub fn categories_for_role(role: &str) -> &'static [&'static str] {
    ROLE_TO_CATEGORIES
        .get(role)
        .copied()
        .unwrap_or(DEFAULT_ROLE_CATEGORIES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_for(audience: Audience) -> Post {
        let mut post = Post::new("p".into(), "P".into());
        post.audience = audience;
        post
    }

    #[test]
    fn test_general_is_visible_to_every_role() {
        let post = post_for(Audience::General);
        for role in ["BUYER", "LAWYER", "GENERAL", "SOMEONE_ELSE", ""] {
            assert!(is_accessible(&post, role), "role {role}");
        }
    }

    #[test]
    fn test_exact_match_only() {
        let post = post_for(Audience::Lawyer);
        assert!(is_accessible(&post, "LAWYER"));
        assert!(!is_accessible(&post, "BUYER"));
        assert!(!is_accessible(&post, "lawyer"));
        assert!(!is_accessible(&post, "GENERAL"));
    }

    #[test]
    fn test_unknown_audience_matches_itself() {
        let post = post_for(Audience::Other("INVESTOR".into()));
        assert!(is_accessible(&post, "INVESTOR"));
        assert!(!is_accessible(&post, "BUYER"));
    }

    #[test]
    fn test_placeholder_audience_is_open() {
        let post = post_for(Audience::Other("undefined".into()));
        assert!(is_accessible(&post, "BUYER"));
    }

    #[test]
    fn test_categories_for_role() {
        assert_eq!(
            categories_for_role("EXISTING_PROPERTY_OWNER"),
            &["general", "property-owner"]
        );
        assert_eq!(categories_for_role("GENERAL"), &["general"]);
        assert_eq!(categories_for_role("ASTRONAUT"), &["general"]);
    }
}
