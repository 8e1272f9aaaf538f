/// Message identifier derivation for MailClip
///
/// Precedence:
/// 1. `th` query parameter of the page URL
/// 2. `th` parameter inside the URL fragment's own query string
///    (webmail keeps navigation state after `#`)
/// 3. Regex match for `th=` anywhere in the raw URL
/// 4. Content hash over subject + sender + timestamp
///
/// URL-provided identifiers win because they survive markup changes;
/// the content hash only has to be deterministic so duplicate captures
/// of the same message collide.
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Length of the hash-style fallback identifier
const HASH_ID_LEN: usize = 20;

/// Derive the message identifier for a capture
pub fn derive_message_id(url: &str, subject: &str, sender: &str, timestamp: &str) -> String {
    from_url(url).unwrap_or_else(|| content_hash(subject, sender, timestamp))
}

/// Identifier from the URL alone, if it carries one
pub fn from_url(url: &str) -> Option<String> {
    thread_param(url)
        .or_else(|| fragment_thread_param(url))
        .or_else(|| thread_param_by_regex(url))
}

/// Identifier for the currently viewed message, used to detect view changes.
/// Falls back to a subject hash so list view and message view compare unequal.
pub fn view_identifier(url: &str, subject: Option<&str>) -> String {
    if let Some(id) = from_url(url) {
        return id;
    }
    match subject {
        Some(subject) if !subject.is_empty() => alphanumeric_prefix(&STANDARD.encode(subject)),
        _ => "unknown".to_string(),
    }
}

fn thread_param(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "th")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

fn fragment_thread_param(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let fragment = parsed.fragment()?;
    let (_, query) = fragment.split_once('?')?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "th")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

fn thread_param_by_regex(url: &str) -> Option<String> {
    static THREAD_RE: OnceLock<Regex> = OnceLock::new();
    let re = THREAD_RE.get_or_init(|| Regex::new(r"[?&]th=([^&]+)").unwrap());
    re.captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Deterministic hash-style identifier from message content
pub fn content_hash(subject: &str, sender: &str, timestamp: &str) -> String {
    let encoded = STANDARD.encode(format!("{}-{}-{}", subject, sender, timestamp));
    alphanumeric_prefix(&encoded)
}

fn alphanumeric_prefix(encoded: &str) -> String {
    encoded
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(HASH_ID_LEN)
        .collect()
}
