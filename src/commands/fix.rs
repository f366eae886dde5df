//! Normalize article files written by hand or by older CMS versions
//!
//! Rewrites front-matter with a stable key order, replaces the `"undefined"`
//! placeholder the CMS used to write, fills in a missing audience and drops
//! duplicated `---` separator lines from the body.

use anyhow::Result;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde_yaml::Value;
use std::fs;
use std::path::PathBuf;
use walkdir::WalkDir;

use crate::content::{split_front_matter, DocumentError, UNDEFINED_PLACEHOLDER};
use crate::Site;

/// Keys written first, in this order; any other keys follow as authored
const KEY_ORDER: [&str; 6] = [
    "title",
    "description",
    "pubDate",
    "heroImage",
    "categories",
    "audience",
];

const DEFAULT_AUDIENCE: &str = "GENERAL";

lazy_static! {
    static ref DUPLICATE_SEPARATORS: Regex =
        Regex::new(r"(?m)^---[ \t]*\r?\n(?:---[ \t]*(?:\r?\n|\z))+").unwrap();
}

/// Outcome of a fix run
#[derive(Debug, Default)]
pub struct FixReport {
    pub changed: Vec<PathBuf>,
    pub unchanged: usize,
    pub failed: Vec<(PathBuf, String)>,
}

/// Fix every article in the content directory. With `dry_run`, only report.
pub fn run(site: &Site, dry_run: bool) -> Result<FixReport> {
    let mut report = FixReport::default();

    if !site.content_dir.exists() {
        tracing::warn!("Content directory not found: {:?}", site.content_dir);
        return Ok(report);
    }

    let loader = site.loader()?;

    for entry in WalkDir::new(&site.content_dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                if let Some(path) = e.path() {
                    report.failed.push((path.to_path_buf(), e.to_string()));
                }
                continue;
            }
        };

        let path = entry.path();
        let is_article = path.is_file()
            && path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e == loader.extension())
                .unwrap_or(false);
        if !is_article {
            continue;
        }

        let original = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Cannot read {:?}: {}", path, e);
                report.failed.push((path.to_path_buf(), e.to_string()));
                continue;
            }
        };

        match fix_document(&original) {
            Ok(fixed) if fixed == original => report.unchanged += 1,
            Ok(fixed) => {
                if dry_run {
                    tracing::info!("Would fix {:?}", path);
                } else if let Err(e) = fs::write(path, fixed) {
                    tracing::error!("Cannot write {:?}: {}", path, e);
                    report.failed.push((path.to_path_buf(), e.to_string()));
                    continue;
                } else {
                    tracing::info!("Fixed {:?}", path);
                }
                report.changed.push(path.to_path_buf());
            }
            Err(e) => {
                tracing::error!("Cannot fix {:?}: {}", path, e);
                report.failed.push((path.to_path_buf(), e.to_string()));
            }
        }
    }

    Ok(report)
}

/// Return the normalized text of one article
pub fn fix_document(text: &str) -> Result<String, DocumentError> {
    let Some((yaml, body)) = split_front_matter(text)? else {
        return Ok(remove_duplicate_separators(text));
    };

    let mut fields: IndexMap<String, Value> = if yaml.trim().is_empty() {
        IndexMap::new()
    } else {
        serde_yaml::from_str(yaml)?
    };

    let mut ordered: IndexMap<String, Value> = IndexMap::new();
    for key in KEY_ORDER {
        if let Some(value) = fields.shift_remove(key) {
            ordered.insert(key.to_string(), value);
        }
    }

    if let Some(hero) = ordered.get_mut("heroImage") {
        if is_placeholder(hero) {
            *hero = Value::String(String::new());
        }
    }

    let audience_missing = ordered
        .get("audience")
        .map(|a| is_placeholder(a) || is_blank(a))
        .unwrap_or(true);
    if audience_missing {
        ordered.insert(
            "audience".to_string(),
            Value::String(DEFAULT_AUDIENCE.to_string()),
        );
    }

    ordered.extend(fields);

    let yaml_out = serde_yaml::to_string(&ordered)?;
    let body = remove_duplicate_separators(body.trim_start_matches(['\n', '\r']));

    Ok(format!("---\n{}---\n\n{}", yaml_out, body))
}

/// Collapse runs of `---` lines into a single separator
fn remove_duplicate_separators(body: &str) -> String {
    DUPLICATE_SEPARATORS.replace_all(body, "---\n").into_owned()
}

fn is_placeholder(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.trim() == UNDEFINED_PLACEHOLDER)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
