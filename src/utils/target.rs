//! Target resolution for the auth commands.
//!
//! Resolves the user a command is aimed at from a reply, a numeric ID,
//! a TextMention entity, or an @username argument.

use teloxide::prelude::*;
use teloxide::types::{Message, MessageEntityKind, UserId};

use crate::bot::dispatcher::{AppState, ThrottledBot};

/// A command target resolved to enough data for a user card.
#[derive(Debug, Clone)]
pub struct ResolvedUser {
    pub user_id: UserId,
    pub first_name: String,
    pub username: Option<String>,
}

impl ResolvedUser {
    fn from_telegram(user: &teloxide::types::User) -> Self {
        Self {
            user_id: user.id,
            first_name: user.first_name.clone(),
            username: user.username.clone(),
        }
    }
}

/// Get the target user from a message.
///
/// Resolution order:
/// 1. Reply message → use `reply.from`
/// 2. Numeric ID argument → lookup via the user store
/// 3. TextMention entity → extract user from entity
/// 4. @username → lookup via the user store, fallback to `get_chat`
///
/// Every lookup failure collapses to `None`; callers answer with a
/// "give a valid target" message instead of erroring out.
pub async fn get_target_user(
    bot: &ThrottledBot,
    msg: &Message,
    state: &AppState,
) -> Option<ResolvedUser> {
    // 1. Check reply
    if let Some(reply) = msg.reply_to_message()
        && let Some(user) = reply.from.as_ref()
    {
        return Some(ResolvedUser::from_telegram(user));
    }

    let text = msg.text()?;
    let arg = text.split_whitespace().nth(1)?;

    // 2. Try numeric ID
    if let Ok(id) = arg.parse::<u64>() {
        return match state.users.get_by_id(id).await {
            Ok(Some(user)) => Some(ResolvedUser {
                user_id: UserId(id),
                first_name: user.first_name,
                username: user.username_display,
            }),
            // An ID we have never seen is still a valid target.
            _ => Some(ResolvedUser {
                user_id: UserId(id),
                first_name: format!("User {}", id),
                username: None,
            }),
        };
    }

    // 3. Try TextMention (users without a public @username)
    if let Some(entities) = msg.entities() {
        for entity in entities {
            if let MessageEntityKind::TextMention { user } = &entity.kind
                && entity.offset < 20
            {
                return Some(ResolvedUser::from_telegram(user));
            }
        }
    }

    // 4. Try @username via the user store
    if arg.starts_with('@') {
        let username = arg.trim_start_matches('@');
        if let Ok(Some(user)) = state.users.get_by_username(username).await {
            return Some(ResolvedUser {
                user_id: UserId(user.user_id),
                first_name: user.first_name,
                username: user.username_display,
            });
        }
        // Fallback to get_chat for users we have never tracked
        if let Ok(chat) = bot.get_chat(arg.to_string()).await
            && chat.is_private()
        {
            return Some(ResolvedUser {
                user_id: UserId(chat.id.0 as u64),
                first_name: chat.first_name().unwrap_or("User").to_string(),
                username: chat.username().map(|u| u.to_string()),
            });
        }
    }

    None
}
