//! In-memory host variable store.

use param_guard_domain::{QUERY_PARAM_NAMESPACE, QueryParams, VariableValue};
use param_guard_ports::VariableStorePort;
use param_guard_shared::{ErrorCode, ErrorEnvelope, Result};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};
use url::Url;

/// Request-scoped variable store backed by a map.
///
/// Stands in for the gateway context in tests and in the CLI.
#[derive(Debug, Default)]
pub struct InMemoryVariableStore {
    variables: RwLock<BTreeMap<String, VariableValue>>,
}

impl InMemoryVariableStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            variables: RwLock::new(BTreeMap::new()),
        }
    }

    /// Builder-style write of a raw variable.
    #[must_use]
    pub fn with_variable(self, name: impl Into<String>, value: impl Into<VariableValue>) -> Self {
        self.write_guard().insert(name.into(), value.into());
        self
    }

    /// Populate `request.queryparam.*` from a raw query string.
    ///
    /// A leading `?` is ignored. Repeated names keep their first value.
    #[must_use]
    pub fn from_query_string(query: &str) -> Self {
        Self::from_query_params(QUERY_PARAM_NAMESPACE, &parse_query_string(query))
    }

    /// Populate `request.queryparam.*` from the query component of a URL.
    pub fn from_url(input: &str) -> Result<Self> {
        let params = parse_url_query(input)?;
        Ok(Self::from_query_params(QUERY_PARAM_NAMESPACE, &params))
    }

    /// Write every present parameter under `namespace + name`.
    #[must_use]
    pub fn from_query_params(namespace: &str, params: &QueryParams) -> Self {
        let variables = params
            .iter()
            .filter_map(|(name, value)| {
                value.map(|value| (format!("{namespace}{name}"), VariableValue::from(value)))
            })
            .collect();
        Self {
            variables: RwLock::new(variables),
        }
    }

    /// Copy of all variables, sorted by name.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, VariableValue> {
        self.read_guard().clone()
    }

    /// Number of stored variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_guard().len()
    }

    /// Returns true when no variable is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_guard().is_empty()
    }

    fn read_guard(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, VariableValue>> {
        self.variables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, VariableValue>> {
        self.variables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl VariableStorePort for InMemoryVariableStore {
    fn get_variable(&self, name: &str) -> Option<VariableValue> {
        self.read_guard().get(name).cloned()
    }

    fn set_variable(&self, name: &str, value: VariableValue) {
        self.write_guard().insert(name.to_string(), value);
    }
}

/// Decode a form-urlencoded query string into ordered parameters.
///
/// A leading `?` is ignored, `+` decodes to a space, and a name without `=`
/// carries an empty value. Repeated names keep their first value.
#[must_use]
pub fn parse_query_string(query: &str) -> QueryParams {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut params = QueryParams::new();
    for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if name.is_empty() || params.contains(&name) {
            continue;
        }
        params.insert(name.into_owned(), Some(value.into_owned()));
    }
    params
}

/// Parse an absolute URL and decode its query component.
pub fn parse_url_query(input: &str) -> Result<QueryParams> {
    let url = Url::parse(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("request", "invalid_url"),
            format!("invalid request URL: {error}"),
        )
        .with_metadata("url", sanitize_url_for_error(input))
    })?;
    Ok(url.query().map(parse_query_string).unwrap_or_default())
}

// Query strings may carry credentials; keep only what precedes the query.
fn sanitize_url_for_error(input: &str) -> String {
    input
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .to_string()
}
