use crate::routes::{self, AppState};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Pause after a failed getUpdates before polling again
pub const POLL_RETRY_DELAY: Duration = Duration::from_secs(1);

/// How long in-flight updates may keep running after shutdown is requested
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Long-polling bot
///
/// Each update is handled in its own task, so a slow search does not hold up
/// other chats. Nothing is shared between tasks except the `Arc`ed clients.
pub struct Bot {
    state: Arc<AppState>,
    poll_timeout_secs: u64,
    shutdown_grace: Duration,
}

impl Bot {
    pub fn new(state: AppState, poll_timeout_secs: u64) -> Self {
        Self {
            state: Arc::new(state),
            poll_timeout_secs,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }

    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    /// Poll until `shutdown` resolves, then wait for in-flight updates
    ///
    /// Handlers still running after the grace period are aborted.
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: std::future::Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut offset = 0;
        let mut handlers = JoinSet::new();

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested, stopping polling");
                    break;
                }
                polled = self.state.telegram.get_updates(offset, self.poll_timeout_secs) => {
                    match polled {
                        Ok(updates) => {
                            for update in updates {
                                offset = offset.max(update.update_id + 1);
                                let state = Arc::clone(&self.state);
                                handlers.spawn(async move {
                                    routes::dispatch(&state, update).await;
                                });
                            }
                        }
                        Err(e) => {
                            tracing::warn!("Polling failed: {}", e);
                            tokio::time::sleep(POLL_RETRY_DELAY).await;
                        }
                    }
                }
            }

            // Reap finished handlers so the set does not grow without bound
            while let Some(finished) = handlers.try_join_next() {
                log_handler_exit(finished);
            }
        }

        if handlers.is_empty() {
            return;
        }

        tracing::info!("Waiting for {} in-flight update(s)", handlers.len());

        let drained = tokio::time::timeout(self.shutdown_grace, async {
            while let Some(finished) = handlers.join_next().await {
                log_handler_exit(finished);
            }
        })
        .await;

        if drained.is_err() {
            tracing::warn!(
                "Aborting {} update(s) still running after {:?}",
                handlers.len(),
                self.shutdown_grace
            );
            handlers.shutdown().await;
        }
    }

    /// Poll until Ctrl-C
    pub async fn run(&self) {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }
}

fn log_handler_exit(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            tracing::error!("Update handler panicked: {}", e);
        }
    }
}
