//! URL validation, normalization and short-URL composition
//!
//! Validation runs on the normalized form and only admits absolute
//! http/https URLs; anything with another scheme (`ftp:`, `javascript:`,
//! `data:`, ...) is rejected outright.

use url::{Host, Url};

use crate::config::get_config;

/// Path prefix under which slugs are served.
pub const SHORT_PATH_PREFIX: &str = "/s/";

/// Prepend `https://` when the input carries no `://`-style scheme.
///
/// A bare `host:port` gets normalized like any other schemeless input;
/// foreign schemes (`ftp://...`) are left untouched so that validation can
/// reject them with the original text.
pub fn normalize_url(url: &str) -> String {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || url.contains("://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// True iff `url` is an absolute http/https URL with a plausible host.
///
/// Bare single-label hosts ("https://not-a-url") are rejected; `localhost`
/// and IP literals are allowed.
pub fn is_valid_url(url: &str) -> bool {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return false;
    }

    match parsed.host() {
        Some(Host::Domain(domain)) => domain == "localhost" || domain.contains('.'),
        Some(_) => true,
        None => false,
    }
}

/// Compose the public short URL for a slug.
///
/// `base_url` falls back to the configured public base; a base without a
/// scheme gets `https://` prepended.
pub fn build_short_url(slug: &str, base_url: Option<&str>) -> String {
    let base = base_url
        .map(str::to_string)
        .unwrap_or_else(|| get_config().server.public_base_url.clone());

    let lower = base.to_ascii_lowercase();
    let base = if lower.starts_with("http://") || lower.starts_with("https://") {
        base
    } else {
        format!("https://{base}")
    };

    format!("{}{}{}", base.trim_end_matches('/'), SHORT_PATH_PREFIX, slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_prepends_https() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("www.example.com/path"), "https://www.example.com/path");
    }

    #[test]
    fn normalize_treats_host_port_as_schemeless() {
        assert_eq!(normalize_url("localhost:8080"), "https://localhost:8080");
        assert_eq!(
            normalize_url("example.com:8080/path"),
            "https://example.com:8080/path"
        );
    }

    #[test]
    fn normalize_preserves_protocol() {
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
        assert_eq!(normalize_url("HTTP://example.com"), "HTTP://example.com");
    }

    #[test]
    fn normalize_leaves_foreign_schemes_for_validation() {
        assert_eq!(normalize_url("ftp://example.com"), "ftp://example.com");
    }

    #[test]
    fn normalized_single_colon_schemes_still_fail_validation() {
        // the bogus "port" makes the normalized form unparseable
        assert_eq!(
            normalize_url("javascript:alert(1)"),
            "https://javascript:alert(1)"
        );
        assert!(!is_valid_url("https://javascript:alert(1)"));
    }

    #[test]
    fn valid_urls() {
        assert!(is_valid_url("http://example.com"));
        assert!(is_valid_url("https://example.com/path?query=1"));
        assert!(is_valid_url("http://localhost:8080"));
        assert!(is_valid_url("https://192.168.1.1/admin"));
    }

    #[test]
    fn invalid_urls() {
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("not-a-url"));
        assert!(!is_valid_url("https://not-a-url"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("javascript:alert(1)"));
        assert!(!is_valid_url("data:text/html,<script>alert(1)</script>"));
        assert!(!is_valid_url("mailto:test@example.com"));
    }

    #[test]
    fn builds_short_url_with_explicit_base() {
        assert_eq!(
            build_short_url("abc123", Some("https://short.ly")),
            "https://short.ly/s/abc123"
        );
    }

    #[test]
    fn builds_short_url_prepending_scheme_on_base() {
        assert_eq!(
            build_short_url("abc123", Some("short.ly")),
            "https://short.ly/s/abc123"
        );
    }

    #[test]
    fn builds_short_url_trimming_trailing_slash() {
        assert_eq!(
            build_short_url("abc123", Some("https://short.ly/")),
            "https://short.ly/s/abc123"
        );
    }

    #[test]
    fn builds_short_url_from_config_default() {
        let short_url = build_short_url("abc123", None);
        assert!(short_url.ends_with("/s/abc123"), "{short_url}");
    }
}
