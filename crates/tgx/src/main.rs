use std::sync::Arc;

use tracing::{info, warn};

use tgx_core::{config::Config, relay::RelayEngine};
use tgx_telegram::{Bot, TelegramNotifier, TelegramSource};
use tgx_xapi::XClient;

#[tokio::main]
async fn main() -> Result<(), tgx_core::Error> {
    tgx_core::logging::init("tgx")?;

    let cfg = Config::load()?;
    info!(
        channels = cfg.telegram_channels.len(),
        min_interval_secs = cfg.post_min_interval.as_secs(),
        posting_disabled = cfg.posting_disabled,
        "configuration loaded"
    );

    let x = Arc::new(XClient::new(
        cfg.x_api_base.clone(),
        cfg.x_access_token.clone(),
        cfg.http_timeout,
    )?);
    if cfg.posting_disabled {
        warn!("posting to X is disabled; channel posts will be ignored");
    } else {
        let me = x.verify_credentials().await?;
        info!(account = %me.username, id = %me.id, "authenticated with X");
    }

    let bot = Bot::new(cfg.telegram_bot_token.clone());
    let mut engine = RelayEngine::new(
        cfg.relay_config(),
        Arc::new(TelegramSource::new(bot.clone())),
        x,
    );
    if let Some(chat_id) = cfg.operator_chat_id {
        engine = engine.with_notifier(Arc::new(TelegramNotifier::new(bot.clone(), chat_id)));
    }

    tgx_telegram::router::run_channel_relay(bot, Arc::new(engine), shutdown_signal())
        .await
        .map_err(|e| tgx_core::Error::External(format!("telegram relay failed: {e}")))?;

    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
