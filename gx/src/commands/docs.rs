// gx/src/commands/docs.rs
//
// USE CASE: Rebuild Data Docs.

use std::path::PathBuf;

use gx_core::application::{build_data_docs, preferred_site};
use gx_core::infrastructure::SystemBrowser;
use gx_core::ports::Browser;

use super::load_context;

pub fn execute(directory: PathBuf, no_view: bool) -> anyhow::Result<i32> {
    let Some(context) = load_context(&directory)? else {
        return Ok(1);
    };

    println!("📚 Building Data Docs...");
    let sites = build_data_docs(&context)?;
    println!("The following Data Docs sites were built:");
    for site in &sites {
        println!("- {}: {}", site.name, site.index_url);
    }

    if !no_view {
        if let Some(site) = preferred_site(&sites) {
            if let Err(e) = SystemBrowser.open(&site.index_url) {
                tracing::debug!(error = %e, "Browser did not open");
                println!("Could not open a browser window. Open this page by hand: {}", site.index_url);
            }
        }
    }
    Ok(0)
}
