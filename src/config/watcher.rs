//! Hot reload of the configuration file.
//!
//! The parent directory is watched rather than the file itself, so saves
//! that replace the file (write to temp, then rename) are still seen. Bursts
//! of events from one save collapse into a single reload.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::SiteConfig;

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Watches one configuration file and publishes each valid new version.
#[derive(Debug, Clone)]
pub struct ConfigWatcher {
    path: PathBuf,
    debounce: Duration,
}

impl ConfigWatcher {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    /// Quiet period that must pass after a change before reloading.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Start watching. Must be called from within a Tokio runtime.
    ///
    /// Returns the notify handle, which must be kept alive, and the
    /// receiver of reloaded configurations. Files that fail to load or
    /// validate are logged and never sent.
    pub fn spawn(
        self,
    ) -> Result<(RecommendedWatcher, mpsc::UnboundedReceiver<SiteConfig>), notify::Error> {
        let file_name = self
            .path
            .file_name()
            .map(OsString::from)
            .ok_or_else(|| notify::Error::generic("config path has no file name"))?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (change_tx, change_rx) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) if is_change_to(&event, &file_name) => {
                let _ = change_tx.send(());
            }
            Ok(_) => {}
            Err(e) => tracing::error!(error = %e, "Config watch error"),
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        let (update_tx, update_rx) = mpsc::unbounded_channel();
        tokio::spawn(reload_on_change(
            self.path.clone(),
            self.debounce,
            change_rx,
            update_tx,
        ));

        tracing::info!(path = %self.path.display(), "Config watcher started");
        Ok((watcher, update_rx))
    }
}

fn is_change_to(event: &Event, file_name: &OsString) -> bool {
    (event.kind.is_modify() || event.kind.is_create())
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
}

async fn reload_on_change(
    path: PathBuf,
    debounce: Duration,
    mut changes: mpsc::UnboundedReceiver<()>,
    updates: mpsc::UnboundedSender<SiteConfig>,
) {
    while changes.recv().await.is_some() {
        // Wait for the burst to settle
        while let Ok(Some(())) = tokio::time::timeout(debounce, changes.recv()).await {}

        tracing::info!(path = %path.display(), "Config file changed, reloading");
        match load_config(&path) {
            Ok(config) => {
                if updates.send(config).is_err() {
                    break;
                }
            }
            Err(e) => tracing::error!(error = %e, "Ignoring unusable config file"),
        }
    }
}
