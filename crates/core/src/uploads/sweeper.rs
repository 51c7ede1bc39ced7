use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use super::UploadStore;

/// Spawn a loop that sweeps expired uploads every `interval` until `shutdown` fires.
pub fn spawn_sweeper(
    store: UploadStore,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Upload sweeper started for {} (every {:?})",
            store.dir().display(),
            interval
        );
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!("Upload sweeper received shutdown signal");
                    break;
                }
                _ = ticker.tick() => {
                    match store.sweep().await {
                        Ok(0) => {}
                        Ok(n) => info!("Swept {} expired uploads", n),
                        Err(e) => warn!("Upload sweep failed: {}", e),
                    }
                }
            }
        }
        info!("Upload sweeper stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_sweeper_runs_and_stops() {
        let dir = TempDir::new().unwrap();
        let store = UploadStore::new(dir.path(), 1024, Duration::from_secs(60));
        let path = store.save("a.png", b"data").await.unwrap();
        std::fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(SystemTime::now() - Duration::from_secs(120))
            .unwrap();

        let (tx, rx) = broadcast::channel(1);
        let handle = spawn_sweeper(store, Duration::from_millis(20), rx);

        // The first tick fires immediately.
        for _ in 0..50 {
            if !path.exists() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(!path.exists());

        tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
