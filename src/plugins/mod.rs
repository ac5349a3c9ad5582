//! Plugin system for command handlers.
//!
//! Commands are recognized with a prefix set wider than Telegram's usual
//! slash (`/ ! % , . @ #`) and case-insensitive names, so routing goes
//! through `parse_command` instead of teloxide's `filter_command`.

pub mod auth;
pub mod biofilter;
pub mod start;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::Me;

use crate::bot::dispatcher::ThrottledBot;

/// Characters that may introduce a command.
pub const COMMAND_PREFIXES: [char; 7] = ['/', '!', '%', ',', '.', '@', '#'];

/// All bot commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Auth,
    Rmauth,
    Authlist,
    Biofilter(String),
    Start,
    Help,
}

/// Parse a command out of message text.
///
/// Accepts any prefix in [`COMMAND_PREFIXES`] and matches names
/// case-insensitively. A `cmd@OtherBot` form addressed to a different bot
/// is not ours and yields `None`, as does any unknown command name.
pub fn parse_command(text: &str, bot_username: &str) -> Option<Command> {
    let mut chars = text.chars();
    let prefix = chars.next()?;
    if !COMMAND_PREFIXES.contains(&prefix) {
        return None;
    }

    let rest = chars.as_str();
    let (token, args) = match rest.split_once(char::is_whitespace) {
        Some((token, args)) => (token, args.trim()),
        None => (rest, ""),
    };

    let (name, target) = match token.split_once('@') {
        Some((name, target)) => (name, Some(target)),
        None => (token, None),
    };
    if let Some(target) = target
        && !target.eq_ignore_ascii_case(bot_username)
    {
        return None;
    }

    match name.to_ascii_lowercase().as_str() {
        "auth" => Some(Command::Auth),
        "rmauth" => Some(Command::Rmauth),
        "authlist" => Some(Command::Authlist),
        "biofilter" => Some(Command::Biofilter(args.to_string())),
        "start" => Some(Command::Start),
        "help" => Some(Command::Help),
        _ => None,
    }
}

/// Build the combined command handler.
pub fn command_handler() -> UpdateHandler<anyhow::Error> {
    use dptree::case;

    dptree::filter_map(|msg: Message, me: Me| {
        msg.text()
            .and_then(|text| parse_command(text, me.username()))
    })
    .branch(case![Command::Auth].endpoint(auth::auth_command))
    .branch(case![Command::Rmauth].endpoint(auth::rmauth_command))
    .branch(case![Command::Authlist].endpoint(auth::authlist_command))
    .branch(case![Command::Biofilter(args)].endpoint(biofilter::biofilter_command))
    .branch(case![Command::Start].endpoint(start::start_command))
    .branch(case![Command::Help].endpoint(start::help_command))
}

/// Build the callback query handler.
pub fn callback_handler() -> UpdateHandler<anyhow::Error> {
    Update::filter_callback_query().branch(
        dptree::filter(|q: CallbackQuery| q.data.as_deref() == Some("close"))
            .endpoint(close_callback),
    )
}

/// Dismiss a message carrying a Close button.
async fn close_callback(bot: ThrottledBot, q: CallbackQuery) -> anyhow::Result<()> {
    if let Some(msg) = &q.message {
        // The bot may have lost delete rights meanwhile
        let _ = bot.delete_message(msg.chat().id, msg.id()).await;
    }
    bot.answer_callback_query(q.id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT: &str = "BiosentryBot";

    #[test]
    fn test_every_prefix_is_accepted() {
        for prefix in COMMAND_PREFIXES {
            let text = format!("{}authlist", prefix);
            assert_eq!(parse_command(&text, BOT), Some(Command::Authlist), "{}", text);
        }
    }

    #[test]
    fn test_names_are_case_insensitive() {
        assert_eq!(parse_command("/AUTH", BOT), Some(Command::Auth));
        assert_eq!(parse_command("!RmAuth @spammer", BOT), Some(Command::Rmauth));
    }

    #[test]
    fn test_bot_suffix() {
        assert_eq!(parse_command("/auth@BiosentryBot", BOT), Some(Command::Auth));
        assert_eq!(parse_command("/auth@biosentrybot", BOT), Some(Command::Auth));
        assert_eq!(parse_command("/auth@SomeOtherBot", BOT), None);
    }

    #[test]
    fn test_args_are_captured() {
        assert_eq!(
            parse_command("/biofilter on", BOT),
            Some(Command::Biofilter("on".to_string()))
        );
        assert_eq!(
            parse_command(".biofilter", BOT),
            Some(Command::Biofilter(String::new()))
        );
    }

    #[test]
    fn test_non_commands_pass_through() {
        assert_eq!(parse_command("hello there", BOT), None);
        assert_eq!(parse_command("@spammer have a look", BOT), None);
        assert_eq!(parse_command("/unknowncmd", BOT), None);
        assert_eq!(parse_command("/", BOT), None);
        assert_eq!(parse_command("", BOT), None);
    }
}
