//! portfolio-rs: a personal portfolio/blog single-page-application core
//!
//! This crate provides the content registry, route resolution, markdown
//! post rendering and offline cache-rule generation behind a small
//! portfolio/blog site, plus a dev server and CLI wrapping them.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod router;
pub mod server;
pub mod views;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::registry::PostRegistry;

/// The portfolio application: configuration plus the loaded post registry
#[derive(Clone)]
pub struct Portfolio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Markdown documents directory
    pub docs_dir: PathBuf,
    /// Static assets directory
    pub assets_dir: PathBuf,
    /// Build output directory
    pub public_dir: PathBuf,
    /// Post registry, immutable after startup
    pub registry: PostRegistry,
}

impl Portfolio {
    /// Create a new Portfolio instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let registry = PostRegistry::new(config.posts.clone())?;

        let docs_dir = base_dir.join(&config.doc_root);
        let assets_dir = base_dir.join(&config.assets_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            docs_dir,
            assets_dir,
            public_dir,
            registry,
        })
    }
}
