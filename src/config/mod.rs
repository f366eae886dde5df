//! Configuration module

mod site;

pub use site::resolve_site_url;
pub use site::SiteConfig;
pub use site::SitemapConfig;
pub use site::DEFAULT_SITE_URL;
