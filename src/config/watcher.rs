//! Configuration file watcher for hot reload.
//!
//! The parent directory is watched rather than the file: editors and config
//! management tools usually replace the file via rename, which drops a watch
//! placed on the old inode. Events for other files in the directory are
//! ignored.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::CollectorConfig;

/// Sends a freshly validated config whenever the file changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<CollectorConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<CollectorConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        (Self { path, update_tx }, update_rx)
    }

    /// Start watching. The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let dir = watch_root(&self.path);
        let Self { path, update_tx } = self;
        let target = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if is_reload_event(&event, &target) => reload(&target, &update_tx),
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Config watcher started");
        Ok(watcher)
    }
}

/// Load `target` and forward it. An unreadable or invalid file is logged and
/// nothing is sent, so the poller keeps running with its current config.
fn reload(target: &Path, update_tx: &mpsc::UnboundedSender<CollectorConfig>) {
    tracing::info!(path = ?target, "Config file change detected, reloading");
    match load_config(target) {
        Ok(config) => {
            let _ = update_tx.send(config);
        }
        Err(e) => {
            tracing::error!(error = %e, "Config reload rejected, keeping current configuration");
        }
    }
}

fn watch_root(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Whether `event` means the config file now has new contents.
fn is_reload_event(event: &Event, target: &Path) -> bool {
    let relevant_kind = matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_));
    relevant_kind && event.paths.iter().any(|p| same_file(p, target))
}

fn same_file(candidate: &Path, target: &Path) -> bool {
    candidate == target
        || (candidate.file_name() == target.file_name()
            && candidate.parent().and_then(|d| d.canonicalize().ok()).as_deref() == target.parent())
}
