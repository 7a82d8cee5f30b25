//! Entity-name extraction from catalog titles.

/// Trailing words that name the kind of integration, not the entity.
pub const GENERIC_SUFFIXES: &[&str] = &[
    "server",
    "mcp",
    "helper",
    "tool",
    "tools",
    "api",
    "service",
    "platform",
    "framework",
    "library",
    "sdk",
    "client",
];

/// Approximate the entity a title is about.
///
/// One trailing generic suffix is stripped ("Binance Server" -> "Binance");
/// otherwise a multi-word title yields its first word and a single word is
/// returned as is. Case is preserved.
pub fn extract_entity_name(title: &str) -> String {
    match strip_generic_suffix(title) {
        Some(head) => head,
        None => {
            let mut words = title.split_whitespace();
            match (words.next(), words.next()) {
                (Some(first), Some(_)) => first.to_string(),
                _ => title.trim().to_string(),
            }
        }
    }
}

/// Seeding key: the lower-cased entity head, for titles that lost a
/// generic suffix or are a single word. Other titles have no key.
pub fn entity_key(title: &str) -> Option<String> {
    let head = match strip_generic_suffix(title) {
        Some(head) => head,
        None => {
            let mut words = title.split_whitespace();
            match (words.next(), words.next()) {
                (Some(only), None) => only.to_string(),
                _ => return None,
            }
        }
    };
    let key = head.to_lowercase();
    (!key.is_empty()).then_some(key)
}

fn strip_generic_suffix(title: &str) -> Option<String> {
    let words: Vec<&str> = title.split_whitespace().collect();
    let (last, head) = words.split_last()?;
    if head.is_empty() {
        return None;
    }
    let last = last.to_lowercase();
    GENERIC_SUFFIXES
        .contains(&last.as_str())
        .then(|| head.join(" "))
}
