//! Event handler system.
//!
//! Handlers here run on every group message, after the command branch
//! has had its chance.

pub mod bio_filter;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::Me;
use tracing::error;

use crate::bot::dispatcher::{AppState, ThrottledBot};

/// Build the message event handler.
pub fn message_event_handler() -> UpdateHandler<anyhow::Error> {
    dptree::filter(|msg: Message| msg.chat.is_group() || msg.chat.is_supergroup())
        .endpoint(unified_message_handler)
}

/// Run all per-message checks; one handler's failure never stops dispatch.
async fn unified_message_handler(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    me: Me,
) -> anyhow::Result<()> {
    if let Err(e) = bio_filter::check_bio(&bot, &msg, &state, &me).await {
        error!("Bio filter error: {}", e);
    }

    Ok(())
}
