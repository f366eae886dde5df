//! Create a new article

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::{split_categories, Audience};
use crate::Site;

/// Options for a new article's front-matter
#[derive(Debug, Default)]
pub struct NewArticle<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub audience: Option<&'a str>,
    pub categories: Option<&'a str>,
}

/// Create a new article file and return its path
pub fn create_post(site: &Site, article: &NewArticle<'_>) -> Result<PathBuf> {
    let now = chrono::Utc::now();
    let slug = slug::slugify(article.title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", article.title);
    }

    fs::create_dir_all(&site.content_dir)?;

    let file_path = site
        .content_dir
        .join(format!("{}.{}", slug, site.config.extension));

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let audience = Audience::from_front_matter(article.audience);
    if let Audience::Other(raw) = &audience {
        tracing::warn!("Unknown audience {:?}, writing it as-is", raw);
    }

    let categories = article
        .categories
        .map(split_categories)
        .unwrap_or_default()
        .join(", ");

    let content = format!(
        "---\ntitle: {}\ndescription: {}\npubDate: {}\nheroImage: \"\"\ncategories: {}\naudience: {}\nfeatured: false\n---\n\n",
        yaml_quote(article.title),
        yaml_quote(article.description.unwrap_or_default()),
        yaml_quote(&now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()),
        yaml_quote(&categories),
        yaml_quote(audience.as_str()),
    );

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Double-quote a YAML scalar
fn yaml_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
