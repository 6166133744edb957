// gx-core/src/ports/browser.rs

use crate::error::GxError;

/// The only side effect that leaves the process: showing a page to the user.
pub trait Browser: Send + Sync {
    fn open(&self, url: &str) -> Result<(), GxError>;
}
