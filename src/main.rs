mod api;
mod config;
mod dispatcher;
mod poller;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{ApiClient, BotApi};
use crate::config::Config;
use crate::dispatcher::Dispatcher;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,greetbot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let token = args
        .next()
        .filter(|token| !token.is_empty())
        .context("Bot API token not found. Usage: greetbot <TOKEN> [CONFIG.toml]")?;

    let config = match args.next().map(PathBuf::from) {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::load(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => Config::default(),
    };

    info!("  API: {}", config.api.base_url());
    info!("  Request timeout: {:?}", config.api.request_timeout());
    info!(
        "  Poll interval: {:?}, error delay: {:?}",
        config.polling.interval(),
        config.polling.error_delay()
    );

    let api: Arc<dyn BotApi> =
        Arc::new(ApiClient::new(token, &config.api).context("Failed to build HTTP client")?);

    match api.get_me().await {
        Ok(me) => info!(
            "Authorized as {} (@{})",
            me.first_name,
            me.username.as_deref().unwrap_or("unknown")
        ),
        Err(e) => warn!("getMe failed, polling anyway: {}", e),
    }

    let mut signals =
        ShutdownSignals::register().context("Failed to install shutdown signal handlers")?;
    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            match signals.recv().await {
                Ok(signal) => {
                    info!("Shutdown requested ({})", signal);
                    cancel.cancel();
                }
                Err(e) => error!("Failed to listen for shutdown signals: {}", e),
            }
        }
    });

    let (poller, mut updates) = poller::spawn(api.clone(), config.polling.clone(), cancel);
    let dispatcher = Dispatcher::new(api);

    info!("Bot is running...");
    while let Some(update) = updates.recv().await {
        dispatcher.dispatch(&update).await;
    }

    poller.await.context("Poller task failed")?;
    info!("Bot stopped");

    Ok(())
}

/// Process signals that stop the bot: Ctrl-C everywhere, SIGTERM on Unix.
struct ShutdownSignals {
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ShutdownSignals {
    /// Install the handlers. Must run inside the runtime.
    fn register() -> std::io::Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            terminate: tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?,
        })
    }

    /// Wait for the first signal and return its name.
    async fn recv(&mut self) -> std::io::Result<&'static str> {
        #[cfg(unix)]
        {
            tokio::select! {
                result = tokio::signal::ctrl_c() => result.map(|()| "SIGINT"),
                _ = self.terminate.recv() => Ok("SIGTERM"),
            }
        }

        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c().await.map(|()| "Ctrl-C")
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_sigterm_is_a_shutdown_signal() {
        let mut signals = ShutdownSignals::register().unwrap();

        let status = std::process::Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        let received = tokio::time::timeout(Duration::from_secs(5), signals.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(received, "SIGTERM");
    }
}
