//! Opening article links outside the terminal.
//!
//! The viewer never calls the platform directly; it goes through a
//! [`LinkOpener`] so tests can record what would have been opened.

use crate::util::{validate_url_for_open, UrlValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpenError {
    #[error("Refusing to open link: {0}")]
    Rejected(#[from] UrlValidationError),
    #[error("Could not launch browser: {0}")]
    Launch(#[from] std::io::Error),
}

/// Capability to show a URL to the user somewhere else.
pub trait LinkOpener: Send {
    fn open(&self, url: &str) -> Result<(), OpenError>;
}

/// Hands links to the desktop's default handler via the `open` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl LinkOpener for SystemOpener {
    fn open(&self, url: &str) -> Result<(), OpenError> {
        // Validate before open::that() to keep non-web schemes away from the shell
        let url = validate_url_for_open(url)?;
        open::that(url.as_str())?;
        Ok(())
    }
}

/// Open `url` unless it is empty.
///
/// Returns `Ok(false)` for the empty-link no-op, `Ok(true)` once the opener
/// accepted the link.
pub fn open_link(opener: &dyn LinkOpener, url: &str) -> Result<bool, OpenError> {
    if url.is_empty() {
        return Ok(false);
    }
    match opener.open(url) {
        Ok(()) => {
            tracing::debug!(url, "Opened article link");
            Ok(true)
        }
        Err(e) => {
            tracing::warn!(url, error = %e, "Failed to open article link");
            Err(e)
        }
    }
}
