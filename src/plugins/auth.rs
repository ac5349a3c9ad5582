//! Authorization command handlers.
//!
//! Commands for managing users exempted from the bio filter.

use teloxide::prelude::*;
use teloxide::types::{
    ChatId, InlineKeyboardButton, InlineKeyboardMarkup, ParseMode, ReplyParameters, UserId,
};
use tracing::info;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::utils::target::{ResolvedUser, get_target_user};
use crate::utils::{format_user_card, mention_html};

const ADMIN_ONLY: &str = "❌ Only group owner or admins can use this command!";
const NO_TARGET: &str = "Reply to a user or give a valid username/user ID!";

/// Handle the auth command - exempt a user from the bio filter.
pub async fn auth_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let (admin_id, target) = match command_context(&bot, &msg, &state).await? {
        Some(ctx) => ctx,
        None => return Ok(()),
    };
    let chat_id = msg.chat.id;

    let card = format_user_card(
        target.user_id.0,
        &target.first_name,
        target.username.as_deref(),
    );

    if state.auth.add_auth(chat_id.0, target.user_id.0).await? {
        bot.send_message(
            chat_id,
            format!("✅ User has been <b>authorized</b>.\n\n{}", card),
        )
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
        info!(
            "User {} authorized in chat {} by {}",
            target.user_id, chat_id, admin_id
        );
    } else {
        bot.send_message(
            chat_id,
            format!("ℹ️ User is already authorized.\n\n{}", card),
        )
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    }

    Ok(())
}

/// Handle the rmauth command - put a user back under the bio filter.
pub async fn rmauth_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let (admin_id, target) = match command_context(&bot, &msg, &state).await? {
        Some(ctx) => ctx,
        None => return Ok(()),
    };
    let chat_id = msg.chat.id;

    let card = format_user_card(
        target.user_id.0,
        &target.first_name,
        target.username.as_deref(),
    );

    if state.auth.remove_auth(chat_id.0, target.user_id.0).await? {
        bot.send_message(
            chat_id,
            format!("❌ User has been <b>unauthorized</b>.\n\n{}", card),
        )
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
        info!(
            "User {} unauthorized in chat {} by {}",
            target.user_id, chat_id, admin_id
        );
    } else {
        bot.send_message(
            chat_id,
            format!("ℹ️ User is not on the authorization list.\n\n{}", card),
        )
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    }

    Ok(())
}

/// Handle the authlist command - list authorized users.
pub async fn authlist_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let chat_id = msg.chat.id;
    let admin_id = match msg.from.as_ref() {
        Some(u) => u.id,
        None => return Ok(()),
    };

    if !msg.chat.is_group() && !msg.chat.is_supergroup() {
        return Ok(());
    }

    if !state
        .permissions
        .is_admin(chat_id, admin_id)
        .await
        .unwrap_or(false)
    {
        bot.send_message(chat_id, ADMIN_ONLY)
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    }

    let list = state.auth.get_auth_users(chat_id.0).await?;

    if list.auth_users.is_empty() {
        bot.send_message(chat_id, "⚠️ No users have been authorized in this group.")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    }

    let mut text = String::from("<b>Authorized users in this group:</b>\n\n");
    for (i, user_id) in list.auth_users.iter().enumerate() {
        let entry = resolve_mention(&bot, &state, *user_id).await;
        text.push_str(&format!("{}. {}\n", i + 1, entry));
    }

    let keyboard =
        InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback("🗑 Close", "close")]]);

    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboard)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    Ok(())
}

/// Shared admin gate + target resolution for auth/rmauth.
///
/// Sends the rejection or usage reply itself; `None` means the caller is
/// done. The registry never sees a request from an unverified caller.
async fn command_context(
    bot: &ThrottledBot,
    msg: &Message,
    state: &AppState,
) -> anyhow::Result<Option<(UserId, ResolvedUser)>> {
    let chat_id = msg.chat.id;
    let admin_id = match msg.from.as_ref() {
        Some(u) => u.id,
        None => return Ok(None),
    };

    if !msg.chat.is_group() && !msg.chat.is_supergroup() {
        bot.send_message(chat_id, "⚠️ This command only works in groups.")
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(None);
    }

    // A failed admin lookup counts as "not admin"
    if !state
        .permissions
        .is_admin(chat_id, admin_id)
        .await
        .unwrap_or(false)
    {
        bot.send_message(chat_id, ADMIN_ONLY)
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(None);
    }

    match get_target_user(bot, msg, state).await {
        Some(target) => Ok(Some((admin_id, target))),
        None => {
            bot.send_message(chat_id, NO_TARGET)
                .reply_parameters(ReplyParameters::new(msg.id))
                .await?;
            Ok(None)
        }
    }
}

/// Resolve a stored user ID to a clickable mention for the listing.
///
/// Falls back to the raw ID when neither the user store nor the gateway
/// knows the user anymore.
async fn resolve_mention(bot: &ThrottledBot, state: &AppState, user_id: u64) -> String {
    if let Ok(Some(user)) = state.users.get_by_id(user_id).await {
        return mention_html(user_id, &user.first_name);
    }

    if let Ok(chat) = bot.get_chat(ChatId(user_id as i64)).await
        && let Some(first_name) = chat.first_name()
    {
        return mention_html(user_id, first_name);
    }

    format!("<code>{}</code> (unable to fetch)", user_id)
}
