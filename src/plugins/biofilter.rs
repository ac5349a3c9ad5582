//! Bio filter toggle command.
//!
//! The filter flag is global to the deployment, so flipping it is
//! reserved for bot owners rather than per-group admins.

use teloxide::prelude::*;
use teloxide::types::ReplyParameters;
use tracing::info;

use crate::bot::dispatcher::{AppState, ThrottledBot};

/// Handle the biofilter command - show or toggle the global filter flag.
pub async fn biofilter_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    let chat_id = msg.chat.id;
    let user_id = match msg.from.as_ref() {
        Some(u) => u.id,
        None => return Ok(()),
    };

    if !state.permissions.is_bot_owner(user_id) {
        bot.send_message(chat_id, "❌ Only the bot owner can manage the bio filter.")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    }

    let reply = match args.to_lowercase().as_str() {
        "" => {
            let enabled = state.bio_filter.get_status().await?;
            format!(
                "Bio filter is currently <b>{}</b>.",
                if enabled { "enabled" } else { "disabled" }
            )
        }
        "on" | "enable" | "yes" => {
            state.bio_filter.set_status(true).await?;
            info!("Bio filter enabled by {}", user_id);
            "✅ Bio filter <b>enabled</b>. Messages from users with links or \
             usernames in their bio will be removed."
                .to_string()
        }
        "off" | "disable" | "no" => {
            state.bio_filter.set_status(false).await?;
            info!("Bio filter disabled by {}", user_id);
            "❌ Bio filter <b>disabled</b>.".to_string()
        }
        _ => "Usage: <code>/biofilter [on|off]</code>".to_string(),
    };

    bot.send_message(chat_id, reply)
        .parse_mode(teloxide::types::ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    Ok(())
}
