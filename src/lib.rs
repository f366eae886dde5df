//! btf-content: article library tooling for the Better than Freehold site
//!
//! Loads MDX articles with YAML front-matter from the content directory and
//! answers the queries the site needs: listings by audience, category or
//! featured flag, single articles by slug, and the derived category and
//! audience indexes. Also generates the sitemap and serves a JSON API.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{ContentLoader, ContentRepository};

/// A site checkout: configuration plus the directories it points at
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration, with the site URL already resolved
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the article files
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Site {
    /// Open a site from a directory, reading `_config.yml` when present and
    /// resolving the site URL from the environment
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();

        Self::with_config(base_dir, config)
    }

    /// Build a site from an already resolved configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();

        // Fail early on a bad timezone rather than on the first query
        config.tz()?;

        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        })
    }

    /// Loader for this site's article files
    pub fn loader(&self) -> Result<ContentLoader> {
        ContentLoader::for_site(self)
    }

    /// Query layer over this site's articles
    pub fn repository(&self) -> Result<ContentRepository> {
        Ok(ContentRepository::new(self.loader()?))
    }

    /// Generate the sitemap, robots.txt and JSON indexes
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
