//! Stock single-field validators.
//!
//! Each returns an empty string when the value is accepted and a
//! human-readable message otherwise, so they plug straight into
//! [`Validators`](param_guard_domain::Validators) through closures.

/// Accept only the literals `true` and `false`.
#[must_use]
pub fn validate_boolean(name: &str, value: &str) -> String {
    if value == "true" || value == "false" {
        String::new()
    } else {
        format!("Valid {name} parameters are \"true\" and \"false\". You passed \"{value}\".")
    }
}

/// Single-value enum check.
///
/// Note the polarity: this reports an error when `value` IS one of
/// `valid_values` and accepts anything else. Gateway flows already depend on
/// that behavior, so it is kept.
#[must_use]
pub fn validate_enum<S: AsRef<str>>(name: &str, value: &str, valid_values: &[S]) -> String {
    if contains(valid_values, value) {
        format!(
            "Valid {name} parameters are {}. You passed \"{value}\".",
            join(valid_values)
        )
    } else {
        String::new()
    }
}

/// Comma-separated list check: every element must be one of `valid_values`.
///
/// Elements are not trimmed, so `"a, b"` fails on `" b"`.
#[must_use]
pub fn validate_multiple_enum<S: AsRef<str>>(
    name: &str,
    values: &str,
    valid_values: &[S],
) -> String {
    if values.split(',').all(|value| contains(valid_values, value)) {
        String::new()
    } else {
        format!(
            "Valid {name} parameters are {} seperated by just a \",\". You passed \"{values}\".",
            join(valid_values)
        )
    }
}

fn contains<S: AsRef<str>>(valid_values: &[S], value: &str) -> bool {
    valid_values.iter().any(|valid| valid.as_ref() == value)
}

fn join<S: AsRef<str>>(valid_values: &[S]) -> String {
    let mut joined = String::new();
    for (index, valid) in valid_values.iter().enumerate() {
        if index > 0 {
            joined.push_str(", ");
        }
        joined.push_str(valid.as_ref());
    }
    joined
}
