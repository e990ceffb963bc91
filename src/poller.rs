use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::api::{BotApi, Update};
use crate::config::PollingConfig;

/// Long-running `getUpdates` loop.
///
/// Owns the offset: it is the only reader and writer, and it only moves
/// forward. Updates are handed off one at a time over a channel of
/// capacity 1, and the poller waits for each to be received before going on.
pub struct Poller {
    api: Arc<dyn BotApi>,
    config: PollingConfig,
    offset: i64,
}

impl Poller {
    pub fn new(api: Arc<dyn BotApi>, config: PollingConfig) -> Self {
        Self {
            api,
            config,
            offset: 0,
        }
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Run one fetch cycle and return how long to wait before the next one.
    ///
    /// Breaks when cancelled or when the receiving side is gone.
    pub async fn poll_once(
        &mut self,
        tx: &mpsc::Sender<Update>,
        cancel: &CancellationToken,
    ) -> ControlFlow<(), Duration> {
        if cancel.is_cancelled() || tx.is_closed() {
            return ControlFlow::Break(());
        }

        let fetched = tokio::select! {
            _ = cancel.cancelled() => return ControlFlow::Break(()),
            result = self.api.get_updates(self.offset) => result,
        };

        let updates = match fetched {
            Ok(updates) => updates,
            Err(e) => {
                error!("Failed to fetch updates at offset {}: {}", self.offset, e);
                return ControlFlow::Continue(self.config.error_delay());
            }
        };

        if !updates.is_empty() {
            debug!(
                "Fetched {} update(s) at offset {}",
                updates.len(),
                self.offset
            );
        }

        for update in updates {
            self.offset = self.offset.max(update.next_offset());
            if !handoff(tx, update, cancel).await {
                return ControlFlow::Break(());
            }
        }

        ControlFlow::Continue(self.config.interval())
    }

    pub async fn run(mut self, tx: mpsc::Sender<Update>, cancel: CancellationToken) {
        info!("Polling for updates...");

        while let ControlFlow::Continue(delay) = self.poll_once(&tx, &cancel).await {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        info!("Poller stopped at offset {}", self.offset());
    }
}

/// Send `update` and wait until the consumer has taken it out of the channel.
/// Returns false if cancelled or the consumer is gone.
async fn handoff(tx: &mpsc::Sender<Update>, update: Update, cancel: &CancellationToken) -> bool {
    let delivered = async {
        tx.send(update).await.ok()?;
        // With capacity 1 a free slot means the update has been received.
        tx.reserve().await.ok().map(drop)
    };

    tokio::select! {
        _ = cancel.cancelled() => false,
        delivered = delivered => delivered.is_some(),
    }
}

/// Start the poller on its own task and return the consumer end of the handoff.
pub fn spawn(
    api: Arc<dyn BotApi>,
    config: PollingConfig,
    cancel: CancellationToken,
) -> (JoinHandle<()>, mpsc::Receiver<Update>) {
    let (tx, rx) = mpsc::channel(1);
    let poller = Poller::new(api, config);
    (tokio::spawn(poller.run(tx, cancel)), rx)
}
