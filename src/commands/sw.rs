//! Generate the offline service-worker artifact

use anyhow::{Context, Result};
use std::fs;

use crate::cache::ServiceWorkerConfig;
use crate::Portfolio;

/// Build the cache rules and either print the workbox-style config as JSON
/// or write the service-worker source into the build output directory.
pub fn run(portfolio: &Portfolio, print_json: bool) -> Result<()> {
    let sw = ServiceWorkerConfig::build(&portfolio.registry, &portfolio.config)?;

    if print_json {
        println!("{}", sw.to_json()?);
        return Ok(());
    }

    let dest = portfolio.base_dir.join(&sw.sw_dest);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&dest, sw.render_service_worker())
        .with_context(|| format!("failed to write {:?}", dest))?;

    println!(
        "Generated {} runtime-caching rules -> {}",
        sw.runtime_caching.len(),
        dest.display()
    );
    Ok(())
}
