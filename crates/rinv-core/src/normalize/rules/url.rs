//! Website normalization.

/// Scheme prepended to bare host names.
pub const DEFAULT_SCHEME: &str = "https://";

/// Ensure a website-like string carries a scheme.
///
/// Absent and empty input pass through unchanged.
pub fn normalize_url(url: Option<&str>) -> Option<String> {
    normalize_url_with(url, DEFAULT_SCHEME)
}

/// Like [`normalize_url`] with a custom scheme prefix.
pub fn normalize_url_with(url: Option<&str>, scheme: &str) -> Option<String> {
    let url = url?;
    if url.is_empty() || has_http_scheme(url) {
        return Some(url.to_string());
    }
    Some(format!("{}{}", scheme, url))
}

fn has_http_scheme(url: &str) -> bool {
    url.get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("http"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adds_scheme() {
        assert_eq!(normalize_url(Some("example.com")).as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_keeps_existing_scheme() {
        assert_eq!(normalize_url(Some("HTTP://x.com")).as_deref(), Some("HTTP://x.com"));
        assert_eq!(normalize_url(Some("https://x.com")).as_deref(), Some("https://x.com"));
    }

    #[test]
    fn test_passes_through_empty() {
        assert_eq!(normalize_url(None), None);
        assert_eq!(normalize_url(Some("")).as_deref(), Some(""));
    }

    #[test]
    fn test_short_and_multibyte_input() {
        assert_eq!(normalize_url(Some("ht")).as_deref(), Some("https://ht"));
        assert_eq!(normalize_url(Some("żółw.pl")).as_deref(), Some("https://żółw.pl"));
    }

    #[test]
    fn test_custom_scheme() {
        assert_eq!(
            normalize_url_with(Some("intranet.local"), "http://").as_deref(),
            Some("http://intranet.local")
        );
    }
}
