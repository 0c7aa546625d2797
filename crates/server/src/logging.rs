//! Log redaction. Anything that looks like a credential is masked before
//! it reaches a log line: values of known-sensitive keys, bearer tokens,
//! and passwords embedded in connection URLs.

use once_cell::sync::Lazy;
use regex::Regex;

pub const REDACTED: &str = "***";

/// Keys whose values are always masked, compared after lowercasing and
/// folding `-` into `_`.
const SENSITIVE_KEYS: &[&str] = &[
    "api_key",
    "apikey",
    "authorization",
    "client_secret",
    "cookie",
    "database_url",
    "password",
    "refresh_token",
    "secret",
    "token",
    "x_api_key",
];

static SENSITIVE_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(api[_-]?key|authorization|password|secret|token|client_secret)\s*[=:]\s*[^,\s;&]+")
        .expect("sensitive pair pattern")
});

static URL_CREDENTIALS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)://([^:/\s]+):([^@/\s]+)@").expect("url credentials pattern"));

static BEARER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bBearer\s+[A-Za-z0-9\-._~+/]+=*").expect("bearer pattern"));

pub fn is_sensitive_key(key: &str) -> bool {
    let normalized = key.trim().to_ascii_lowercase().replace('-', "_");
    SENSITIVE_KEYS.contains(&normalized.as_str())
}

/// Masks secret-looking fragments inside free-form text.
pub fn redact_text(text: &str) -> String {
    let text = URL_CREDENTIALS.replace_all(text, "://$1:***@");
    let text = BEARER_TOKEN.replace_all(&text, "Bearer ***");
    SENSITIVE_PAIR.replace_all(&text, "$1=***").into_owned()
}

/// Sanitizes a raw query string for the access log: values of sensitive
/// keys are dropped outright, everything else is scrubbed.
pub fn sanitize_query(query: &str) -> String {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if is_sensitive_key(key) => format!("{key}={REDACTED}"),
            Some((key, value)) => format!("{key}={}", redact_text(value)),
            None => pair.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_matching_ignores_case_and_separators() {
        assert!(is_sensitive_key("X-API-Key"));
        assert!(is_sensitive_key("Authorization"));
        assert!(is_sensitive_key(" token "));
        assert!(!is_sensitive_key("lat"));
    }

    #[test]
    fn bearer_tokens_are_masked() {
        assert_eq!(
            redact_text("Bearer eyJhbGciOiJIUzI1NiJ9.payload"),
            "Bearer ***"
        );
    }

    #[test]
    fn url_credentials_are_masked() {
        assert_eq!(
            redact_text("postgres://orgdir:hunter2@db:5432/orgdir"),
            "postgres://orgdir:***@db:5432/orgdir"
        );
    }

    #[test]
    fn key_value_secrets_are_masked() {
        assert_eq!(redact_text("api_key=abc123 lat=55.76"), "api_key=*** lat=55.76");
    }

    #[test]
    fn query_strings_keep_harmless_parameters() {
        assert_eq!(
            sanitize_query("lat=55.76&lon=37.63&api_key=abc123"),
            "lat=55.76&lon=37.63&api_key=***"
        );
    }
}
