//! Generator module - writes the sitemap, robots.txt and JSON indexes

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;
use crate::content::{ContentRepository, Post};
use crate::helpers::{audience_path, category_path, date_xml, full_url_for, post_path};
use crate::Site;

/// Static output generator
pub struct Generator {
    site: Site,
    repository: ContentRepository,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Result<Self> {
        Ok(Self {
            site: site.clone(),
            repository: site.repository()?,
        })
    }

    /// Generate every output file
    pub fn generate(&self) -> Result<()> {
        let public_dir = &self.site.public_dir;
        fs::create_dir_all(public_dir.join("api"))?;

        let posts = self.repository.all_posts(None)?;
        let categories = self.repository.all_categories()?;
        let audiences = self.repository.all_audiences()?;
        let now = Utc::now();

        let sitemap = render_sitemap(&self.site.config, &posts, &categories, &audiences, now);
        write_output(public_dir, "sitemap.xml", &sitemap)?;

        write_output(public_dir, "robots.txt", &render_robots(&self.site.config))?;

        write_json(public_dir, "api/posts.json", &ApiEnvelope::ok("posts", &posts))?;
        write_json(
            public_dir,
            "api/categories.json",
            &ApiEnvelope::ok("categories", &categories),
        )?;
        write_json(
            public_dir,
            "api/audiences.json",
            &ApiEnvelope::ok("audiences", &audiences),
        )?;

        tracing::info!(
            "Generated outputs for {} posts, {} categories, {} audiences",
            posts.len(),
            categories.len(),
            audiences.len()
        );

        Ok(())
    }
}

/// JSON response shape shared by the generated files and the HTTP API:
/// `{ "success": bool, "<key>": data, "error"?: message }`
#[derive(Debug, Serialize)]
pub struct ApiEnvelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub data: std::collections::BTreeMap<&'static str, T>,
}

impl<T: Serialize> ApiEnvelope<T> {
    pub fn ok(key: &'static str, data: T) -> Self {
        Self {
            success: true,
            error: None,
            data: [(key, data)].into_iter().collect(),
        }
    }

    pub fn failed(key: &'static str, error: impl Into<String>, empty: T) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            data: [(key, empty)].into_iter().collect(),
        }
    }
}

/// One `<url>` entry of the sitemap
struct SitemapEntry {
    loc: String,
    lastmod: DateTime<Utc>,
    changefreq: String,
    priority: f32,
}

/// Render sitemap.xml: static routes, then articles, categories and audiences
pub fn render_sitemap(
    config: &SiteConfig,
    posts: &[Post],
    categories: &[String],
    audiences: &[String],
    now: DateTime<Utc>,
) -> String {
    let sitemap = &config.sitemap;
    let mut entries: Vec<SitemapEntry> = Vec::new();

    for route in &sitemap.routes {
        let priority = if route.trim_matches('/').is_empty() {
            sitemap.home_priority
        } else {
            sitemap.priority
        };
        entries.push(SitemapEntry {
            loc: full_url_for(config, route),
            lastmod: now,
            changefreq: sitemap.change_frequency.clone(),
            priority,
        });
    }

    for post in posts {
        entries.push(SitemapEntry {
            loc: full_url_for(config, &post_path(config, &post.slug)),
            lastmod: post.pub_date.unwrap_or(now),
            changefreq: sitemap.change_frequency.clone(),
            priority: sitemap.priority,
        });
    }

    for category in categories {
        entries.push(SitemapEntry {
            loc: full_url_for(config, &category_path(config, category)),
            lastmod: now,
            changefreq: "weekly".to_string(),
            priority: sitemap.priority,
        });
    }

    for audience in audiences {
        entries.push(SitemapEntry {
            loc: full_url_for(config, &audience_path(config, audience)),
            lastmod: now,
            changefreq: "weekly".to_string(),
            priority: sitemap.priority,
        });
    }

    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');

    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
        xml.push_str(&format!("    <lastmod>{}</lastmod>\n", date_xml(&entry.lastmod)));
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            escape_xml(&entry.changefreq)
        ));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Render robots.txt pointing crawlers at the sitemap
pub fn render_robots(config: &SiteConfig) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}\n",
        full_url_for(config, "/sitemap.xml")
    )
}

fn write_output(public_dir: &Path, name: &str, content: &str) -> Result<()> {
    let output_path = public_dir.join(name);
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_path, content)?;
    tracing::info!("Generated {}", name);
    Ok(())
}

fn write_json<T: Serialize>(public_dir: &Path, name: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_output(public_dir, name, &json)
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
