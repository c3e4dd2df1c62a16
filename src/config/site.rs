//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::content::registry::PostEntry;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub author: String,
    pub copyright: String,
    pub description: String,
    pub language: String,

    // Home page work list
    pub work: Vec<String>,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub doc_root: String,
    pub doc_ext: String,
    pub assets_dir: String,
    pub public_dir: String,

    // Rendering
    pub fetch_timeout_secs: u64,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Offline caching
    #[serde(default)]
    pub cache: CacheConfig,

    // Post table, most-recent-first. Declaration order is display order.
    pub posts: Vec<PostEntry>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "houssein.".to_string(),
            author: "Houssein Djirdeh".to_string(),
            copyright: "MMXVIII Houssein Djirdeh".to_string(),
            description: String::new(),
            language: "en".to_string(),

            work: vec![
                "rangle.io".to_string(),
                "deloitte digital".to_string(),
                "onramp".to_string(),
            ],

            url: "https://finallyits2.surge.sh".to_string(),
            root: "/".to_string(),

            doc_root: "posts".to_string(),
            doc_ext: "md".to_string(),
            assets_dir: "assets".to_string(),
            public_dir: "_site".to_string(),

            fetch_timeout_secs: 10,
            highlight: HighlightConfig::default(),

            cache: CacheConfig::default(),

            posts: default_posts(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Syntax highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Language assumed for fenced blocks with no usable tag
    pub default_language: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            default_language: "bash".to_string(),
        }
    }
}

/// Offline cache configuration, consumed by the cache-rule generator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Regex source matching image asset requests
    pub image_assets_pattern: String,
    /// Cache bucket for the app shell root
    pub shell_cache_name: String,
    /// Output name of the generated service worker
    pub sw_dest: String,
    /// Build-output file patterns handed to the precache manifest
    pub precache_globs: Vec<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            image_assets_pattern: "assets".to_string(),
            shell_cache_name: "index".to_string(),
            sw_dest: "service-worker.js".to_string(),
            precache_globs: vec![
                "**/*.html".to_string(),
                "**/*.js".to_string(),
                "**/*.css".to_string(),
                "**/*.png".to_string(),
            ],
        }
    }
}

/// The built-in post table, used when `_config.yml` declares none.
pub fn default_posts() -> Vec<PostEntry> {
    vec![
        PostEntry {
            id: "thinking-prpl".to_string(),
            title: "Thinking PRPL - A Progressive Web Pattern".to_string(),
            date: "2018-06-18T13:37:27+00:00".to_string(),
            description: "The PRPL pattern is not a specific technology or tool, but rather a \
                          methodology for building web applications that load fast and reliably..."
                .to_string(),
        },
        PostEntry {
            id: "looking-back-2017".to_string(),
            title: "Looking back at 2017".to_string(),
            date: "2018-01-05T11:12:22+00:00".to_string(),
            description: "I'm late, I know.".to_string(),
        },
        PostEntry {
            id: "progressive-angular-applications".to_string(),
            title: "Progressive Web Apps with Angular".to_string(),
            date: "2017-01-17T08:11:22+00:00".to_string(),
            description: "Progressive Web Applications have been the talk of the town in the past \
                          few months. In short, they use modern web capabilities to provide a user \
                          experience similar to that of mobile apps..."
                .to_string(),
        },
        PostEntry {
            id: "continuous-integration-angular-firebase-travisci".to_string(),
            title: "Continuous Integration | Angular CLI + Firebase + Travis CI".to_string(),
            date: "2017-01-07T09:43:26+00:00".to_string(),
            description: "After completing the first step of building your application, the next \
                          thing most of us do is pick a hosting platform and deploy it..."
                .to_string(),
        },
        PostEntry {
            id: "angular2-hacker-news".to_string(),
            title: "Building Hacker News with Angular 2 CLI, RxJS and Webpack".to_string(),
            date: "2016-09-16T04:22:45+00:00".to_string(),
            description: "If you have ever built an Angular 2 application before, you'll know that \
                          setting up and bootstrapping an application can take a significant amount \
                          of time..."
                .to_string(),
        },
        PostEntry {
            id: "angular2-with-immutablejs-and-redux".to_string(),
            title: "Building Angular 2 Applications with Immutable.js and Redux".to_string(),
            date: "2016-07-04T16:55:34+00:00".to_string(),
            description: "If you have done any JavaScript development in the past year, then you \
                          may have already heard of Redux..."
                .to_string(),
        },
        PostEntry {
            id: "event-and-style-binding-in-angular2".to_string(),
            title: "Event and style binding in Angular 2".to_string(),
            date: "2016-05-29T14:22:22+00:00".to_string(),
            description: "Angular 2 introduces new template syntax and directives that allow us to \
                          manipulate data in our applications..."
                .to_string(),
        },
        PostEntry {
            id: "asynchronous-javascript-callbacks".to_string(),
            title: "Asynchronous JavaScript: Callbacks".to_string(),
            date: "2016-05-10T02:33:45+00:00".to_string(),
            description: "Functions in Javascript are treated as first-class objects. This means \
                          that they have a type of \"Object\" and can be referenced like any other \
                          first-class object..."
                .to_string(),
        },
    ]
}
