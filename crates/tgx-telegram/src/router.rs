use std::{future::Future, sync::Arc};

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};
use tracing::{info, warn};

use tgx_core::relay::{RelayEngine, RelayOutcome};

use crate::convert::inbound_from_message;

/// Long-poll Telegram and feed every channel post into the relay engine until
/// `shutdown` resolves.
pub async fn run_channel_relay<S>(
    bot: Bot,
    engine: Arc<RelayEngine>,
    shutdown: S,
) -> anyhow::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    match bot.get_me().await {
        Ok(me) => info!(bot = %me.username(), "telegram relay started"),
        Err(e) => warn!(error = %e, "telegram get_me failed; continuing"),
    }

    let handler = dptree::entry().branch(Update::filter_channel_post().endpoint(handle_channel_post));

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![engine])
        .default_handler(|_upd| async {})
        .build();

    let token = dispatcher.shutdown_token();
    tokio::spawn(async move {
        shutdown.await;
        info!("shutdown requested; stopping dispatcher");
        match token.shutdown() {
            Ok(done) => done.await,
            Err(e) => warn!(error = %e, "dispatcher was not running"),
        }
    });

    dispatcher.dispatch().await;
    info!("telegram relay stopped");

    Ok(())
}

async fn handle_channel_post(msg: Message, engine: Arc<RelayEngine>) -> ResponseResult<()> {
    let inbound = inbound_from_message(&msg);
    let outcome = engine.handle(&inbound).await;
    if let RelayOutcome::Posted { post_id, .. } = &outcome {
        tracing::debug!(message_id = msg.id.0, %post_id, "channel post relayed");
    }
    Ok(())
}
