//! Content module - articles, front-matter and the query layer over them

pub mod access;
pub mod display;
mod error;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;
pub mod repository;

pub use error::DocumentError;
pub use frontmatter::FrontMatter;
pub(crate) use frontmatter::{split_categories, split_front_matter};
pub use loader::ContentLoader;
pub use markdown::{heading_slug, FaqItem, Heading, MarkdownRenderer};
pub use post::{Audience, Post, UNDEFINED_PLACEHOLDER};
pub use repository::ContentRepository;
