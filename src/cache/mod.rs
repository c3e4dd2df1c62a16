//! Offline cache-rule generation
//!
//! Derives the runtime-caching rules the offline layer (a workbox-style
//! service worker) applies, from the same post registry the views read.
//! One rule per post id plus two fixed rules: the app shell root and image
//! assets. Output order is deterministic so build artifacts are
//! reproducible: fixed rules first, then registry order. A duplicate
//! derived cache name indicates a registry invariant violation and halts
//! artifact generation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::config::{CacheConfig, SiteConfig};
use crate::content::registry::PostRegistry;

/// Workbox CDN script imported by the generated worker
const WORKBOX_CDN: &str =
    "https://storage.googleapis.com/workbox-cdn/releases/3.6.3/workbox-sw.js";

/// Cache bucket for the fixed image-assets rule
const IMAGE_ASSETS_CACHE: &str = "image-assets";

/// Cache-rule generation errors; fatal at build time
#[derive(Error, Debug)]
pub enum CacheRuleError {
    #[error("duplicate cache name `{0}` derived from the registry")]
    DuplicateCacheName(String),
}

/// Caching strategy applied by the offline layer, serialized with the
/// handler names the workbox consumer expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheStrategy {
    #[serde(rename = "staleWhileRevalidate")]
    StaleWhileRevalidate,
    #[serde(rename = "networkFirst")]
    NetworkFirst,
    #[serde(rename = "cacheFirst")]
    CacheFirst,
}

impl CacheStrategy {
    /// Handler name as it appears in the generated worker source
    fn js_name(&self) -> &'static str {
        match self {
            CacheStrategy::StaleWhileRevalidate => "staleWhileRevalidate",
            CacheStrategy::NetworkFirst => "networkFirst",
            CacheStrategy::CacheFirst => "cacheFirst",
        }
    }
}

/// A URL pattern understood by the cache layer: either a literal matched
/// against request URLs or a regular-expression source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "source", rename_all = "lowercase")]
pub enum UrlPattern {
    Literal(String),
    Regex(String),
}

impl UrlPattern {
    /// The pattern as it appears in the generated worker source
    fn to_js(&self) -> String {
        match self {
            UrlPattern::Literal(s) => format!("\"{}\"", s),
            UrlPattern::Regex(s) => format!("/{}/", s),
        }
    }
}

/// A single declarative runtime-caching rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheRule {
    pub url_pattern: UrlPattern,
    pub handler: CacheStrategy,
    pub cache_name: String,
}

impl CacheRule {
    fn stale_while_revalidate(url_pattern: UrlPattern, cache_name: impl Into<String>) -> Self {
        Self {
            url_pattern,
            handler: CacheStrategy::StaleWhileRevalidate,
            cache_name: cache_name.into(),
        }
    }
}

/// Derive the runtime-caching rules for a registry. Pure: output depends
/// only on the registry id list and the fixed built-in rules.
pub fn generate(
    registry: &PostRegistry,
    config: &CacheConfig,
    site_url: &str,
) -> Result<Vec<CacheRule>, CacheRuleError> {
    let mut rules = Vec::with_capacity(registry.len() + 2);

    let shell = format!("^{}\\/$", escape_regex(site_url.trim_end_matches('/')));
    rules.push(CacheRule::stale_while_revalidate(
        UrlPattern::Regex(shell),
        config.shell_cache_name.clone(),
    ));
    rules.push(CacheRule::stale_while_revalidate(
        UrlPattern::Regex(config.image_assets_pattern.clone()),
        IMAGE_ASSETS_CACHE,
    ));

    for id in registry.ids() {
        rules.push(CacheRule::stale_while_revalidate(
            UrlPattern::Literal(id.clone()),
            format!("post-{}", id),
        ));
    }

    let mut seen = HashSet::with_capacity(rules.len());
    for rule in &rules {
        if !seen.insert(rule.cache_name.as_str()) {
            return Err(CacheRuleError::DuplicateCacheName(rule.cache_name.clone()));
        }
    }

    Ok(rules)
}

/// Escape a literal string for use inside a regular-expression source.
/// `/` is escaped too since the pattern is rendered as a JS regex literal.
fn escape_regex(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    for c in literal.chars() {
        if matches!(
            c,
            '.' | '+' | '*' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|' | '\\'
                | '/'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// The full serializable artifact handed to the offline-caching layer:
/// precache glob patterns plus the derived runtime-caching rules
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceWorkerConfig {
    pub glob_directory: String,
    pub glob_patterns: Vec<String>,
    pub runtime_caching: Vec<CacheRule>,
    pub sw_dest: String,
}

impl ServiceWorkerConfig {
    /// Build the artifact for a registry and site configuration
    pub fn build(registry: &PostRegistry, config: &SiteConfig) -> Result<Self, CacheRuleError> {
        let runtime_caching = generate(registry, &config.cache, &config.url)?;
        Ok(Self {
            glob_directory: config.public_dir.clone(),
            glob_patterns: config.cache.precache_globs.clone(),
            runtime_caching,
            sw_dest: format!("{}/{}", config.public_dir, config.cache.sw_dest),
        })
    }

    /// Pretty-printed JSON form, field order preserved
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Render the service-worker source consumed by the browser
    pub fn render_service_worker(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("importScripts(\"{}\");\n\n", WORKBOX_CDN));
        out.push_str("self.__precacheManifest = [].concat(self.__precacheManifest || []);\n");
        out.push_str("workbox.precaching.precacheAndRoute(self.__precacheManifest, {});\n\n");

        for rule in &self.runtime_caching {
            out.push_str(&format!(
                "workbox.routing.registerRoute({}, workbox.strategies.{}({{ \"cacheName\":\"{}\", plugins: [] }}), 'GET');\n",
                rule.url_pattern.to_js(),
                rule.handler.js_name(),
                rule.cache_name
            ));
        }

        out
    }
}
