//! Parameter validator contract and the per-parameter registry.

use crate::ValidatorOutcome;
use std::collections::BTreeMap;
use std::fmt;

/// Judges one parameter value.
///
/// Closures of the form `|value: &str| -> impl Into<ValidatorOutcome>`
/// implement this trait, so legacy shapes (`bool`, `String`, `Vec<String>`)
/// can be returned directly.
pub trait ParamValidator: Send + Sync {
    /// Validate a present parameter value.
    fn validate(&self, value: &str) -> ValidatorOutcome;
}

impl<F, O> ParamValidator for F
where
    F: Fn(&str) -> O + Send + Sync,
    O: Into<ValidatorOutcome>,
{
    fn validate(&self, value: &str) -> ValidatorOutcome {
        self(value).into()
    }
}

/// Validators keyed by the parameter name they judge.
#[derive(Default)]
pub struct Validators {
    by_name: BTreeMap<String, Box<dyn ParamValidator>>,
}

impl Validators {
    /// Create an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            by_name: BTreeMap::new(),
        }
    }

    /// Register (or replace) the validator for `name`.
    pub fn insert(&mut self, name: impl Into<String>, validator: impl ParamValidator + 'static) {
        self.by_name.insert(name.into(), Box::new(validator));
    }

    /// Builder-style [`Validators::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, validator: impl ParamValidator + 'static) -> Self {
        self.insert(name, validator);
        self
    }

    /// Validator registered for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn ParamValidator> {
        self.by_name.get(name).map(|validator| &**validator)
    }

    /// Registered parameter names (sorted).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    /// Number of registered validators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns true when no validators are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl fmt::Debug for Validators {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Validators")
            .field("names", &self.by_name.keys().collect::<Vec<_>>())
            .finish()
    }
}
