//! Launching external links in the desktop's default handler.

use std::io::Result as IoResult;

use tracing::debug;

/// Project page opened by the "show on GitHub" action.
pub const PROJECT_URL: &str = "https://github.com/punker76/simple-music-player";

/// Opens URLs outside the application.
pub trait LinkOpener: Send + Sync {
    /// Hands `url` to the operating system.
    ///
    /// # Errors
    ///
    /// Returns an IO error if no handler could be launched.
    fn open(&self, url: &str) -> IoResult<()>;
}

/// Opens links with the operating system's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLinkOpener;

impl LinkOpener for SystemLinkOpener {
    fn open(&self, url: &str) -> IoResult<()> {
        debug!("Opening {url} in default handler");
        open::that_detached(url)
    }
}
