//! Site configuration (_config.yml)

use anyhow::{anyhow, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Production domain used when nothing else provides a site URL
pub const DEFAULT_SITE_URL: &str = "https://betterthanfreehold.com";

/// Environment variables consulted for the site URL, in priority order
const SITE_URL_ENV_VARS: [&str; 2] = ["SITE_URL", "VERCEL_URL"];

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    /// IANA timezone used for front-matter dates without an offset
    pub timezone: Option<String>,

    // URL
    pub url: String,
    /// URL prefix for article pages
    pub resources_dir: String,
    pub category_dir: String,
    pub audience_dir: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,
    /// Extension of article files, without the dot
    pub extension: String,

    // Sitemap
    #[serde(default)]
    pub sitemap: SitemapConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Better than Freehold".to_string(),
            description: String::new(),
            author: "Better than Freehold".to_string(),
            language: "en".to_string(),
            timezone: None,

            url: DEFAULT_SITE_URL.to_string(),
            resources_dir: "resources".to_string(),
            category_dir: "categories".to_string(),
            audience_dir: "audiences".to_string(),

            content_dir: "content/posts".to_string(),
            public_dir: "public".to_string(),
            extension: "mdx".to_string(),

            sitemap: SitemapConfig::default(),
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

    /// Resolve the site URL from the process environment, falling back to the
    /// configured value. Called once when the site is opened.
    pub fn apply_env(&mut self) {
        let from_env = SITE_URL_ENV_VARS
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.trim().is_empty());

        if let Some(value) = &from_env {
            tracing::debug!("Site URL taken from environment: {}", value);
        }

        self.url = resolve_site_url(from_env.as_deref().or(Some(self.url.as_str())));
    }

    /// Parse the configured timezone, defaulting to UTC
    pub fn tz(&self) -> Result<Tz> {
        match self.timezone.as_deref().map(str::trim) {
            None | Some("") => Ok(Tz::UTC),
            Some(name) => name
                .parse::<Tz>()
                .map_err(|e| anyhow!("Invalid timezone {:?}: {}", name, e)),
        }
    }
}

/// Normalize a site URL candidate: add a scheme to bare hosts and strip
/// trailing slashes. Empty input yields the production domain.
pub fn resolve_site_url(candidate: Option<&str>) -> String {
    let base = candidate.map(str::trim).unwrap_or_default();
    if base.is_empty() {
        return DEFAULT_SITE_URL.to_string();
    }

    let with_scheme = if base.starts_with("http") {
        base.to_string()
    } else {
        format!("https://{}", base)
    };

    with_scheme.trim_end_matches('/').to_string()
}

/// Sitemap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Static routes always present in the sitemap
    pub routes: Vec<String>,
    pub change_frequency: String,
    pub priority: f32,
    pub home_priority: f32,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        let routes = [
            "/",
            "/about/",
            "/learn-more/",
            "/structure/",
            "/compliance/",
            "/legal-professionals/",
            "/property-developers/",
            "/owners/",
            "/buyers/",
            "/faqs/",
            "/resources/",
            "/contact/",
            "/privacy/",
            "/terms/",
        ];

        Self {
            routes: routes.iter().map(|r| r.to_string()).collect(),
            change_frequency: "monthly".to_string(),
            priority: 0.7,
            home_priority: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.url, DEFAULT_SITE_URL);
        assert_eq!(config.content_dir, "content/posts");
        assert_eq!(config.extension, "mdx");
        assert_eq!(config.sitemap.routes.len(), 14);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Site
url: https://staging.example.com/
timezone: Asia/Bangkok
content_dir: posts
sitemap:
  routes:
    - /
    - /about/
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Site");
        assert_eq!(config.content_dir, "posts");
        assert_eq!(config.public_dir, "public");
        assert_eq!(config.sitemap.routes, vec!["/", "/about/"]);
        assert_eq!(config.sitemap.change_frequency, "monthly");
        assert_eq!(config.tz().unwrap(), chrono_tz::Asia::Bangkok);
    }

    #[test]
    fn test_invalid_timezone() {
        let config = SiteConfig {
            timezone: Some("Mars/Olympus".to_string()),
            ..Default::default()
        };
        assert!(config.tz().is_err());
    }

    #[test]
    fn test_resolve_site_url() {
        assert_eq!(resolve_site_url(None), DEFAULT_SITE_URL);
        assert_eq!(resolve_site_url(Some("  ")), DEFAULT_SITE_URL);
        assert_eq!(
            resolve_site_url(Some("my-app.vercel.app")),
            "https://my-app.vercel.app"
        );
        assert_eq!(
            resolve_site_url(Some("http://localhost:3000//")),
            "http://localhost:3000"
        );
    }
}
