//! Validator outcomes.

/// Result of running one validator against one parameter value.
///
/// Each invalid variant produces one or more rejections; a rejection without
/// a message (or with an empty message) falls back to the default
/// `Invalid <key> parameter. You passed "<value>".` text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatorOutcome {
    /// The value is accepted.
    Valid,
    /// The value is rejected; use the default message.
    InvalidDefault,
    /// The value is rejected with an explicit message.
    InvalidWithMessage(String),
    /// The value is rejected with one record per message.
    InvalidWithMessages(Vec<String>),
}

impl ValidatorOutcome {
    /// Returns true when the outcome accepts the value.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Expand the outcome into rejections, in order.
    ///
    /// `None` means "use the default message". An empty message list is a
    /// single default-message rejection.
    #[must_use]
    pub fn into_rejections(self) -> Vec<Option<String>> {
        match self {
            Self::Valid => Vec::new(),
            Self::InvalidDefault => vec![None],
            Self::InvalidWithMessage(message) => vec![non_empty(message)],
            Self::InvalidWithMessages(messages) if messages.is_empty() => vec![None],
            Self::InvalidWithMessages(messages) => messages.into_iter().map(non_empty).collect(),
        }
    }
}

fn non_empty(message: String) -> Option<String> {
    if message.is_empty() {
        None
    } else {
        Some(message)
    }
}

/// `true` accepts, `false` rejects with the default message.
impl From<bool> for ValidatorOutcome {
    fn from(valid: bool) -> Self {
        if valid { Self::Valid } else { Self::InvalidDefault }
    }
}

/// An empty string accepts; any other string is the rejection message.
impl From<String> for ValidatorOutcome {
    fn from(message: String) -> Self {
        if message.is_empty() {
            Self::Valid
        } else {
            Self::InvalidWithMessage(message)
        }
    }
}

impl From<&str> for ValidatorOutcome {
    fn from(message: &str) -> Self {
        Self::from(message.to_owned())
    }
}

/// An empty list rejects with the default message; otherwise one rejection
/// per message.
impl From<Vec<String>> for ValidatorOutcome {
    fn from(messages: Vec<String>) -> Self {
        if messages.is_empty() {
            Self::InvalidDefault
        } else {
            Self::InvalidWithMessages(messages)
        }
    }
}

impl From<Vec<&str>> for ValidatorOutcome {
    fn from(messages: Vec<&str>) -> Self {
        Self::from(
            messages
                .into_iter()
                .map(str::to_owned)
                .collect::<Vec<String>>(),
        )
    }
}
