//! URL helper functions

use crate::config::SiteConfig;

/// Canonical URL for a site path, never with a trailing slash
///
/// # Examples
/// ```ignore
/// canonical_url(&config, "/about/") // -> "https://betterthanfreehold.com/about"
/// canonical_url(&config, "")        // -> "https://betterthanfreehold.com"
/// ```
pub fn canonical_url(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    let path = path.trim_start_matches('/').trim_end_matches('/');

    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

/// Generate a full URL including the domain, keeping the trailing slash of
/// `path`
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}/{}", base, path.trim_start_matches('/'))
}

/// URL segment for a category: `glossary/definition` -> `glossary-definition`
pub fn category_slug(category: &str) -> String {
    category.replace('/', "-")
}

/// URL segment for an audience: `EXISTING_PROPERTY_OWNER` -> `existing-property-owner`
pub fn audience_slug(audience: &str) -> String {
    audience.to_lowercase().replace('_', "-")
}

/// Inverse of [`audience_slug`]
pub fn audience_from_slug(slug: &str) -> String {
    slug.to_uppercase().replace('-', "_")
}

/// Site path of an article page
pub fn post_path(config: &SiteConfig, slug: &str) -> String {
    format!(
        "/{}/{}/",
        config.resources_dir.trim_matches('/'),
        encode_url(slug)
    )
}

/// Site path of a category page
pub fn category_path(config: &SiteConfig, category: &str) -> String {
    format!(
        "/{}/{}/",
        config.category_dir.trim_matches('/'),
        encode_url(&category_slug(category))
    )
}

/// Site path of an audience page
pub fn audience_path(config: &SiteConfig, audience: &str) -> String {
    format!(
        "/{}/{}/",
        config.audience_dir.trim_matches('/'),
        encode_url(&audience_slug(audience))
    )
}

/// Percent-encode a single path segment
pub fn encode_url(segment: &str) -> String {
    const SEGMENT: &percent_encoding::AsciiSet = &percent_encoding::NON_ALPHANUMERIC
        .remove(b'-')
        .remove(b'_')
        .remove(b'.')
        .remove(b'~');
    percent_encoding::utf8_percent_encode(segment, SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        SiteConfig {
            url: "https://example.com/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_canonical_url() {
        let config = test_config();
        assert_eq!(canonical_url(&config, ""), "https://example.com");
        assert_eq!(canonical_url(&config, "/"), "https://example.com");
        assert_eq!(
            canonical_url(&config, "//resources/lease-basics/"),
            "https://example.com/resources/lease-basics"
        );
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/about/"),
            "https://example.com/about/"
        );
    }

    #[test]
    fn test_category_slugs() {
        assert_eq!(category_slug("glossary/definition"), "glossary-definition");
        assert_eq!(category_slug("educational/how-to"), "educational-how-to");
    }

    #[test]
    fn test_audience_slugs() {
        assert_eq!(audience_slug("EXISTING_PROPERTY_OWNER"), "existing-property-owner");
        assert_eq!(audience_from_slug("existing-property-owner"), "EXISTING_PROPERTY_OWNER");
    }

    #[test]
    fn test_paths() {
        let config = test_config();
        assert_eq!(post_path(&config, "what is a lease"), "/resources/what%20is%20a%20lease/");
        assert_eq!(
            category_path(&config, "educational/how-to"),
            "/categories/educational-how-to/"
        );
        assert_eq!(audience_path(&config, "LAWYER"), "/audiences/lawyer/");
    }
}
