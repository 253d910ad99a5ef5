//! Masks credentials carried in request URLs before they reach logs or errors.

use url::Url;

/// Replacement value for a masked query parameter.
pub const REDACTED: &str = "REDACTED";

/// Query parameters whose values are never shown.
const SECRET_PARAMS: &[&str] = &["apikey"];

/// Returns `raw` with the value of every non-empty `apikey` query pair
/// replaced by [`REDACTED`].
///
/// Strings that do not parse as URLs, or carry no secret, are returned
/// unchanged.
///
/// ```
/// use wallhaven_core::download::redact_url;
///
/// let shown = redact_url("https://wallhaven.cc/api/v1/search?q=sea&apikey=abc123&page=2");
/// assert_eq!(shown, "https://wallhaven.cc/api/v1/search?q=sea&apikey=REDACTED&page=2");
/// ```
#[must_use]
pub fn redact_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };

    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    if !pairs.iter().any(|(key, value)| is_secret(key, value)) {
        return raw.to_string();
    }

    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs.iter().map(|(key, value)| {
            if is_secret(key, value) {
                (key.as_str(), REDACTED)
            } else {
                (key.as_str(), value.as_str())
            }
        }));
    url.into()
}

fn is_secret(key: &str, value: &str) -> bool {
    !value.is_empty() && SECRET_PARAMS.contains(&key)
}
