//! Bio content matchers.
//!
//! Detects links and @username mentions inside a user's profile biography.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches http://, https:// or www. followed by non-whitespace.
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(https?://|www\.)\S+").expect("url pattern is valid")
});

/// Matches @ followed by one or more word characters.
static USERNAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)@\w+").expect("username pattern is valid")
});

/// What triggered a bio violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BioMatch {
    Url,
    Username,
}

/// Check a biography for links or username mentions.
///
/// Returns `None` for a clean (or empty) bio. The URL pattern is checked
/// first, matching the reporting priority in the violation log.
pub fn find_bio_violation(bio: &str) -> Option<BioMatch> {
    if bio.is_empty() {
        return None;
    }
    if URL_PATTERN.is_match(bio) {
        return Some(BioMatch::Url);
    }
    if USERNAME_PATTERN.is_match(bio) {
        return Some(BioMatch::Username);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_schemes() {
        assert_eq!(find_bio_violation("visit https://spam.example"), Some(BioMatch::Url));
        assert_eq!(find_bio_violation("visit http://spam.example"), Some(BioMatch::Url));
        assert_eq!(find_bio_violation("visit www.spam.example"), Some(BioMatch::Url));
    }

    #[test]
    fn test_url_case_insensitive() {
        assert_eq!(find_bio_violation("HTTPS://SPAM.EXAMPLE"), Some(BioMatch::Url));
        assert_eq!(find_bio_violation("WWW.spam.example"), Some(BioMatch::Url));
    }

    #[test]
    fn test_username_mention() {
        assert_eq!(find_bio_violation("contact me @spammer"), Some(BioMatch::Username));
        assert_eq!(find_bio_violation("@a"), Some(BioMatch::Username));
    }

    #[test]
    fn test_url_reported_before_username() {
        // A bio with both triggers reports the link.
        assert_eq!(
            find_bio_violation("dm @spammer or https://spam.example"),
            Some(BioMatch::Url)
        );
    }

    #[test]
    fn test_clean_bio() {
        assert_eq!(find_bio_violation(""), None);
        assert_eq!(find_bio_violation("just a person"), None);
        assert_eq!(find_bio_violation("email: someone at example dot com"), None);
        // Bare @ with no word characters is not a mention
        assert_eq!(find_bio_violation("meet @ noon"), None);
    }

}
