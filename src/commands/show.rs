//! Show a single article

use anyhow::Result;
use std::fmt::Write;

use crate::content::display::{audience_display_name, category_display_name};
use crate::content::MarkdownRenderer;
use crate::helpers::{canonical_url, full_date, post_path};
use crate::Site;

/// What `show` prints besides the metadata
#[derive(Debug, Default, Clone, Copy)]
pub struct ShowOptions {
    /// Outline and FAQ
    pub toc: bool,
    /// Body rendered to HTML
    pub html: bool,
}

/// Print an article's metadata, and optionally its outline, FAQ and body
pub fn run(site: &Site, slug: &str, role: Option<&str>, options: ShowOptions) -> Result<()> {
    print!("{}", describe(site, slug, role, options)?);
    Ok(())
}

/// Build the text `show` prints
pub fn describe(site: &Site, slug: &str, role: Option<&str>, options: ShowOptions) -> Result<String> {
    let repository = site.repository()?;

    let Some(post) = repository.post_by_slug(slug, role) else {
        anyhow::bail!("Article not found: {}", slug);
    };

    let renderer = MarkdownRenderer::new();
    let mut out = String::new();

    writeln!(out, "{}", post.title)?;
    if !post.description.is_empty() {
        writeln!(out, "  {}", post.description)?;
    }
    if let Some(date) = &post.pub_date {
        writeln!(out, "  Published: {}", full_date(date))?;
    }
    writeln!(out, "  Audience:  {}", audience_display_name(post.audience.as_str()))?;
    if !post.categories.is_empty() {
        let names: Vec<_> = post
            .categories
            .iter()
            .map(|c| category_display_name(c))
            .collect();
        writeln!(out, "  Categories: {}", names.join(", "))?;
    }
    if post.featured {
        writeln!(out, "  Featured")?;
    }
    if let Some(hero) = &post.hero_image {
        writeln!(out, "  Hero image: {}", hero)?;
    }
    writeln!(out, "  Reading time: {} min", renderer.reading_time(&post.content))?;
    writeln!(
        out,
        "  URL: {}",
        canonical_url(&site.config, &post_path(&site.config, &post.slug))
    )?;

    if options.toc {
        let headings = renderer.table_of_contents(&post.content);
        if !headings.is_empty() {
            writeln!(out, "\nContents:")?;
            for heading in headings {
                let indent = "  ".repeat(heading.level.saturating_sub(1) as usize);
                writeln!(out, "  {}{} (#{})", indent, heading.text, heading.slug)?;
            }
        }

        let faq = renderer.extract_faq(&post.content);
        if !faq.is_empty() {
            writeln!(out, "\nFAQ:")?;
            for item in faq {
                writeln!(out, "  Q: {}\n  A: {}", item.question, item.answer)?;
            }
        }
    }

    if options.html {
        writeln!(out, "\n{}", renderer.render(&post.content))?;
    }

    Ok(out)
}
