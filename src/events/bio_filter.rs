//! Bio filter event handler.
//!
//! Inspects the sender's profile biography on every group message and
//! removes the message when the bio advertises a link or username.
//!
//! The checks run cheapest-first so most messages never touch the
//! gateway: admin status, then the chat's auth list, then the global
//! flag, and only then the profile fetch and pattern match.

use std::time::Duration;

use teloxide::RequestError;
use teloxide::prelude::*;
use teloxide::types::{
    ChatId, InlineKeyboardButton, InlineKeyboardMarkup, Me, ParseMode, UserId,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::plugins::parse_command;
use crate::utils::matcher::find_bio_violation;
use crate::utils::{full_name, html_escape, mention_html};

/// How long the in-group warning stays up before the bot removes it.
const WARNING_TTL: Duration = Duration::from_secs(10);

/// Gateway failures the filter recovers from.
///
/// Each variant has exactly one fallback at its call site: a failed
/// profile fetch counts as an empty bio, a refused delete leaves the
/// message in place, and a failed report or warning is dropped. None of
/// them abort message processing.
#[derive(Debug, Error)]
enum GatewayFailure {
    #[error("profile fetch for user {user_id} failed: {source}")]
    BioFetch {
        user_id: u64,
        source: RequestError,
    },
    #[error("could not delete message {message_id} in chat {chat_id}: {source}")]
    DeleteForbidden {
        chat_id: i64,
        message_id: i32,
        source: RequestError,
    },
    #[error("violation report to log channel {channel_id} failed: {source}")]
    ReportSend {
        channel_id: i64,
        source: RequestError,
    },
    #[error("warning reply in chat {chat_id} failed: {source}")]
    WarnSend {
        chat_id: i64,
        source: RequestError,
    },
}

/// Check the sender's bio and suppress the message on a violation.
pub async fn check_bio(
    bot: &ThrottledBot,
    msg: &Message,
    state: &AppState,
    me: &Me,
) -> anyhow::Result<()> {
    let user = match msg.from.as_ref() {
        Some(u) => u,
        None => return Ok(()),
    };
    if user.is_bot {
        return Ok(());
    }
    if !msg.chat.is_group() && !msg.chat.is_supergroup() {
        return Ok(());
    }
    // Commands are handled by the command branch
    if let Some(text) = msg.text()
        && parse_command(text, me.username()).is_some()
    {
        return Ok(());
    }

    let chat_id = msg.chat.id;
    let user_id = user.id;

    // Admins are exempt; a failed lookup does NOT exempt
    if state
        .permissions
        .is_admin(chat_id, user_id)
        .await
        .unwrap_or(false)
    {
        return Ok(());
    }

    // Authorized users are exempt
    let auth = state.auth.get_auth_users(chat_id.0).await?;
    if auth.is_authorized(user_id.0) {
        debug!("User {} is authorized in chat {}, skipping", user_id, chat_id);
        return Ok(());
    }

    if !state.bio_filter.get_status().await? {
        return Ok(());
    }

    // Fetch failure counts as an empty bio
    let bio = match fetch_bio(bot, user_id).await {
        Ok(bio) => bio,
        Err(e) => {
            warn!("{}", e);
            String::new()
        }
    };

    let violation = match find_bio_violation(&bio) {
        Some(v) => v,
        None => return Ok(()),
    };

    info!(
        "Bio violation ({:?}) by user {} in chat {}",
        violation, user_id, chat_id
    );

    // Delete refusal is a no-op, the remaining side effects still run
    if let Err(source) = bot.delete_message(chat_id, msg.id).await {
        warn!(
            "{}",
            GatewayFailure::DeleteForbidden {
                chat_id: chat_id.0,
                message_id: msg.id.0,
                source,
            }
        );
    }

    send_violation_report(bot, msg, state, &bio).await;
    send_warning(bot, chat_id, user_id, &user.first_name).await;

    Ok(())
}

/// Fetch a user's profile biography.
async fn fetch_bio(bot: &ThrottledBot, user_id: UserId) -> Result<String, GatewayFailure> {
    let chat = bot
        .get_chat(ChatId(user_id.0 as i64))
        .await
        .map_err(|source| GatewayFailure::BioFetch {
            user_id: user_id.0,
            source,
        })?;

    Ok(chat.bio().unwrap_or_default().to_string())
}

/// Report the violation to the configured log channel.
///
/// Send failures are logged, never propagated.
async fn send_violation_report(bot: &ThrottledBot, msg: &Message, state: &AppState, bio: &str) {
    let channel_id = match state.log_channel_id {
        Some(id) => id,
        None => {
            debug!("LOG_CHANNEL_ID not set, skipping violation report");
            return;
        }
    };

    // Guarded by check_bio
    let user = match msg.from.as_ref() {
        Some(u) => u,
        None => return,
    };

    let username = match &user.username {
        Some(u) => format!("@{}", u),
        None => "No username".to_string(),
    };
    let group_name = msg.chat.title().unwrap_or("Unknown");
    let message_text = msg.text().unwrap_or("Media Message");

    let report = format!(
        "<b>Bio Filter Log</b>\n\
         <b>Full Name:</b> {}\n\
         <b>Username:</b> <code>{}</code>\n\
         <b>User ID:</b> <code>{}</code>\n\
         <b>Mention:</b> {}\n\
         <b>Group Name:</b> <code>{}</code>\n\
         <b>Group Chat ID:</b> <code>{}</code>\n\
         <b>User Bio:</b> <code>{}</code>\n\
         <b>User Message:</b> <code>{}</code>\n\
         <b>Bot Name:</b> @{}",
        html_escape(&full_name(user)),
        html_escape(&username),
        user.id,
        mention_html(user.id.0, &user.first_name),
        html_escape(group_name),
        msg.chat.id,
        html_escape(bio),
        html_escape(message_text),
        state.bot_username,
    );

    let startgroup = format!("https://t.me/{}?startgroup=true", state.bot_username);
    let keyboard = startgroup.parse().ok().map(|url| {
        InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::url(
            "➕ Add me to your group",
            url,
        )]])
    });

    let mut req = bot
        .send_message(ChatId(channel_id), report)
        .parse_mode(ParseMode::Html);
    if let Some(kb) = keyboard {
        req = req.reply_markup(kb);
    }

    if let Err(source) = req.await {
        warn!("{}", GatewayFailure::ReportSend { channel_id, source });
    }
}

/// Post a transient warning in the group and remove it after [`WARNING_TTL`].
async fn send_warning(bot: &ThrottledBot, chat_id: ChatId, user_id: UserId, first_name: &str) {
    let text = format!(
        "{}, please remove links or usernames from your bio!",
        mention_html(user_id.0, first_name)
    );
    let keyboard =
        InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback("Close", "close")]]);

    match bot
        .send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboard)
        .await
    {
        Ok(warning) => {
            let bot = bot.clone();
            tokio::spawn(async move {
                tokio::time::sleep(WARNING_TTL).await;
                // The warning may already be gone
                let _ = bot.delete_message(chat_id, warning.id).await;
            });
        }
        Err(source) => {
            warn!(
                "{}",
                GatewayFailure::WarnSend {
                    chat_id: chat_id.0,
                    source,
                }
            );
        }
    }
}
