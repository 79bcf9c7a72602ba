//! Secret detection and redaction utilities.
//!
//! Gateway query strings routinely carry credentials (`api_key`, `access_token`,
//! signed-URL signatures). These helpers keep those values out of logs and
//! error metadata.

/// The redacted placeholder string.
pub const REDACTED: &str = "[REDACTED]";

/// Checks if a key/parameter name likely refers to a secret.
///
/// Uses case-insensitive pattern matching on common naming conventions.
///
/// # Examples
///
/// ```
/// use param_guard_shared::is_secret_key;
///
/// assert!(is_secret_key("api_key"));
/// assert!(is_secret_key("access_token"));
/// assert!(is_secret_key("X-Signature"));
/// assert!(!is_secret_key("limit"));
/// ```
pub fn is_secret_key(key: &str) -> bool {
    let key = key.to_ascii_uppercase();
    key.contains("KEY")
        || key.contains("TOKEN")
        || key.contains("SECRET")
        || key.contains("PASSWORD")
        || key.contains("CREDENTIAL")
        || key.contains("AUTH")
        || key.contains("SIGNATURE")
}

/// Redacts a value if the key is likely a secret.
///
/// # Examples
///
/// ```
/// use param_guard_shared::redact_if_secret;
///
/// assert_eq!(redact_if_secret("apikey", "sk-123"), "[REDACTED]");
/// assert_eq!(redact_if_secret("sort", "asc"), "asc");
/// ```
pub fn redact_if_secret(key: &str, value: &str) -> String {
    if is_secret_key(key) {
        REDACTED.to_string()
    } else {
        value.to_string()
    }
}
