//! Declarative parameter rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A declarative validator for one parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", deny_unknown_fields)]
pub enum ParamRule {
    /// Value must be the literal `true` or `false`.
    Boolean,
    /// Single-value enum check.
    ///
    /// Rejects values that ARE listed and accepts anything else. This mirrors
    /// the long-standing gateway helper and is kept as-is for compatibility.
    Enum {
        /// Enumerated values.
        values: Vec<String>,
    },
    /// Comma-separated list where every element must be listed.
    MultiEnum {
        /// Allowed values.
        values: Vec<String>,
    },
}

impl ParamRule {
    /// Stable rule kind name (matches the serialized `kind`).
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Enum { .. } => "enum",
            Self::MultiEnum { .. } => "multiEnum",
        }
    }

    /// Enumerated values, if the rule carries any.
    #[must_use]
    pub fn values(&self) -> Option<&[String]> {
        match self {
            Self::Boolean => None,
            Self::Enum { values } | Self::MultiEnum { values } => Some(values.as_slice()),
        }
    }
}

impl fmt::Display for ParamRule {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.values() {
            None => formatter.write_str(self.kind()),
            Some(values) => write!(formatter, "{}({})", self.kind(), values.join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn rules_deserialize_by_kind() -> Result<(), Box<dyn Error>> {
        let rule: ParamRule = serde_json::from_str(r#"{"kind":"boolean"}"#)?;
        assert_eq!(rule, ParamRule::Boolean);

        let rule: ParamRule = serde_json::from_str(r#"{"kind":"multiEnum","values":["a","b"]}"#)?;
        assert_eq!(rule.kind(), "multiEnum");
        assert_eq!(rule.to_string(), "multiEnum(a, b)");
        Ok(())
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let parsed: Result<ParamRule, _> = serde_json::from_str(r#"{"kind":"regex"}"#);
        assert!(parsed.is_err());
    }
}
