//! Filesystem-safe identifiers derived from URLs and host names.

use url::Url;

/// Reduces `value` to the alphabet `[a-z0-9_]`.
///
/// A leading `http://` or `https://` scheme is dropped, every run of
/// non-alphanumeric characters collapses to a single `_`, and the result is
/// trimmed of `_` and lowercased. Sanitizing an already sanitized string
/// returns it unchanged.
#[must_use]
pub fn sanitize(value: &str) -> String {
    let value = strip_scheme(value);
    let mut out = String::with_capacity(value.len());
    let mut prev_sep = false;
    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            prev_sep = false;
        } else if !prev_sep {
            out.push('_');
            prev_sep = true;
        }
    }
    out.trim_matches('_').to_string()
}

fn strip_scheme(value: &str) -> &str {
    value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .unwrap_or(value)
}

/// Returns the sanitized path component of `url`.
///
/// Scheme, host, and query are discarded. Input that does not parse as an
/// absolute URL is treated as a relative path: everything from the first `?`
/// on is dropped and the rest is sanitized.
#[must_use]
pub fn path_from_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => sanitize(parsed.path()),
        Err(_) => {
            let raw = url.split('?').next().unwrap_or_default();
            sanitize(raw)
        }
    }
}
