//! Utility functions.
//!
//! Shared formatting helpers used across plugins and event handlers.

pub mod matcher;
pub mod target;

use teloxide::types::User;

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Build a clickable HTML mention for a user ID.
pub fn mention_html(user_id: u64, name: &str) -> String {
    format!(
        "<a href=\"tg://user?id={}\">{}</a>",
        user_id,
        html_escape(name)
    )
}

/// Format a user's full name (first + optional last).
pub fn full_name(user: &User) -> String {
    match &user.last_name {
        Some(last) => format!("{} {}", user.first_name, last),
        None => user.first_name.clone(),
    }
}

/// Render the user card appended to auth command replies.
///
/// Shows mention, ID and username; users without a username get a
/// "No Username" placeholder.
pub fn format_user_card(user_id: u64, first_name: &str, username: Option<&str>) -> String {
    let username = match username {
        Some(u) => format!("@{}", u),
        None => "No Username".to_string(),
    };
    format!(
        "<b>Name:</b> {}\n<b>User ID:</b> <code>{}</code>\n<b>Username:</b> <code>{}</code>",
        mention_html(user_id, first_name),
        user_id,
        username
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a<b>&c"), "a&lt;b&gt;&amp;c");
        assert_eq!(html_escape("plain"), "plain");
    }

    #[test]
    fn test_mention_html_escapes_name() {
        let mention = mention_html(42, "<evil>");
        assert_eq!(mention, "<a href=\"tg://user?id=42\">&lt;evil&gt;</a>");
    }

    #[test]
    fn test_format_user_card() {
        let card = format_user_card(42, "Alice", Some("alice"));
        assert!(card.contains("tg://user?id=42"));
        assert!(card.contains("<code>42</code>"));
        assert!(card.contains("@alice"));

        let card = format_user_card(7, "Bob", None);
        assert!(card.contains("No Username"));
    }
}
