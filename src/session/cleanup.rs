//! Periodic removal of expired sessions

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tower_sessions::session_store::ExpiredDeletion;
use tracing::{debug, info, warn};

/// Handle to the background cleanup task
pub struct CleanupTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl CleanupTask {
    /// Stop the timer and wait for an in-flight run to finish
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Session cleanup task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Spawn a task that calls `delete_expired` once per `period`.
///
/// The first run happens one full period after the call. A failed run is
/// logged and the timer keeps going.
pub fn spawn_cleanup<S>(store: S, period: Duration) -> CleanupTask
where
    S: ExpiredDeletion + 'static,
{
    let (shutdown, mut stop) = watch::channel(false);

    let handle = tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        info!(period_secs = period.as_secs(), "Session cleanup scheduled");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match store.delete_expired().await {
                        Ok(()) => debug!("Expired sessions removed"),
                        Err(e) => warn!(error = %e, "Session cleanup failed"),
                    }
                }
                _ = stop.changed() => {
                    info!("Session cleanup stopped");
                    break;
                }
            }
        }
    });

    CleanupTask { shutdown, handle }
}
