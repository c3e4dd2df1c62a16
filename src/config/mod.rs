//! Configuration module

mod site;

pub use site::default_posts;
pub use site::CacheConfig;
pub use site::HighlightConfig;
pub use site::SiteConfig;
