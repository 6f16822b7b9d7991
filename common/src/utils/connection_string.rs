//! Connection string helpers.

use url::Url;

const MASK: &str = "****";

/// Returns the hostname of a single-host connection string.
///
/// Returns `None` when the string is not a URI or has no host. Seed lists
/// (`mongodb://a:1,b:2`) are not valid URIs either; callers fall back to the
/// driver's parsed host list for those.
pub fn host_from_uri(connection_string: &str) -> Option<String> {
    Url::parse(connection_string)
        .ok()
        .and_then(|url| url.host_str().map(str::to_owned))
        .filter(|host| !host.is_empty())
}

/// Masks the password of a connection string for display.
pub fn redact(connection_string: &str) -> String {
    if let Ok(mut url) = Url::parse(connection_string) {
        if url.password().is_none() {
            return connection_string.to_string();
        }
        if url.set_password(Some(MASK)).is_ok() {
            return url.to_string();
        }
    }

    // Not a parseable URI (e.g. a seed list): mask the whole user info.
    match (connection_string.find("://"), connection_string.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end + 3 => format!(
            "{}{}{}",
            &connection_string[..scheme_end + 3],
            MASK,
            &connection_string[at..]
        ),
        _ => connection_string.to_string(),
    }
}
