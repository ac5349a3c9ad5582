//! start and help command handlers.

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};

use crate::bot::dispatcher::{AppState, ThrottledBot};

/// Handle the start command.
pub async fn start_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let text = "👋 Hi! I keep groups clean by removing messages from users \
                who carry links or usernames in their profile bio.\n\n\
                Add me to a group and promote me with delete rights, then \
                use /help to see the commands.";

    let startgroup = format!("https://t.me/{}?startgroup=true", state.bot_username);
    let keyboard = startgroup.parse().ok().map(|url| {
        InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::url(
            "➕ Add me to your group",
            url,
        )]])
    });

    let mut req = bot.send_message(msg.chat.id, text);
    if let Some(kb) = keyboard {
        req = req.reply_markup(kb);
    }
    req.await?;

    Ok(())
}

/// Handle the help command.
pub async fn help_command(bot: ThrottledBot, msg: Message, _state: AppState) -> anyhow::Result<()> {
    let text = "<b>Commands</b>\n\n\
                /auth - exempt a user from the bio filter (reply or username/ID)\n\
                /rmauth - remove a user's exemption\n\
                /authlist - list exempted users in this group\n\
                /biofilter [on|off] - show or toggle the filter (bot owner)\n\n\
                Commands also work with the prefixes <code>! % , . @ #</code>.";

    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}
