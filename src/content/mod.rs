//! Content module - the post registry and the rendering pipeline

pub mod fetcher;
mod markdown;
pub mod registry;
pub mod renderer;

pub(crate) use markdown::html_escape;
pub use markdown::MarkdownRenderer;
pub use registry::{PostEntry, PostRegistry};
