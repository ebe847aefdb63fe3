//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::RelayConfig;

/// Watches the config file and publishes each new, valid, changed config.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<RelayConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end of its updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<RelayConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. The returned handle must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx;
        let path = self.path.clone();
        // Editors emit several events per save; only forward real changes.
        let last = Mutex::new(load_config(&path).ok());

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    match load_config(&path) {
                        Ok(new_config) => {
                            let mut last = last.lock().expect("config watcher mutex poisoned");
                            if last.as_ref() != Some(&new_config) {
                                tracing::info!(path = ?path, "Config file changed, reloading");
                                *last = Some(new_config.clone());
                                let _ = tx.send(new_config);
                            }
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to reload config, keeping current configuration");
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(file: &mut std::fs::File, chat_id: &str) {
        file.set_len(0).unwrap();
        std::io::Seek::rewind(file).unwrap();
        write!(file, "[relay]\nbot_token = \"123:abc\"\nchat_id = \"{chat_id}\"\n").unwrap();
        file.sync_all().unwrap();
    }

    #[tokio::test]
    async fn test_publishes_changed_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write_config(file.as_file_mut(), "-1");

        let (watcher, mut updates) = ConfigWatcher::new(file.path());
        let _handle = watcher.run().unwrap();

        write_config(file.as_file_mut(), "-2");

        let update = tokio::time::timeout(Duration::from_secs(10), updates.recv())
            .await
            .expect("no reload within timeout")
            .unwrap();
        assert_eq!(update.relay.chat_id, "-2");
    }
}
