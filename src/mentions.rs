//! `@username` mention extraction

use regex_lite::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// `@` followed by one or more ASCII word characters
static MENTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(\w+)").expect("Invalid mention regex"));

/// Extract the unique usernames mentioned in `content`.
///
/// Matching is case-sensitive and usernames are not checked for existence.
/// Duplicates are collapsed, keeping first-occurrence order.
///
/// ```
/// use balze::mentions::extract_mentions;
///
/// let mentions = extract_mentions("hi @alice and @bob, also @alice");
/// assert_eq!(mentions, vec!["alice", "bob"]);
/// ```
pub fn extract_mentions(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();

    MENTION_REGEX
        .captures_iter(content)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .filter(|username| seen.insert(*username))
        .map(str::to_string)
        .collect()
}
