// Application state module
// Holds the loaded configuration and the resolved filesystem roots

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Notify;

use super::types::Config;

/// Application state shared by every connection
pub struct AppState {
    pub config: Config,
    /// Canonical root directory; replaces changing the process working directory
    pub root_dir: PathBuf,
    /// Data directory scanned by the listing endpoint
    pub data_dir: PathBuf,
    /// Notified once when the server should stop accepting connections
    pub shutdown: Arc<Notify>,
}

impl AppState {
    /// Resolve the configured directories once at startup
    pub fn new(config: &Config) -> io::Result<Self> {
        let root_dir = Path::new(&config.paths.root_dir).canonicalize()?;
        let data_dir = root_dir.join(&config.paths.data_dir);

        Ok(Self {
            config: config.clone(),
            root_dir,
            data_dir,
            shutdown: Arc::new(Notify::new()),
        })
    }

    /// Resolve a client-supplied path: relative paths against the root, absolute as given
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root_dir.join(path)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Build a state rooted at `root` with default settings
    pub fn state_in(root: &Path) -> AppState {
        let mut cfg = Config::load_from(None, None).unwrap();
        cfg.paths.root_dir = root.to_string_lossy().into_owned();
        cfg.logging.access_log = false;
        AppState::new(&cfg).unwrap()
    }
}
