//! Query-parameter and raw variable accessors over the host context.
//!
//! None of these operations fail: a missing value reads as `None` and writes
//! of absent values are skipped.

pub use param_guard_domain::QUERY_PARAM_NAMESPACE;
use param_guard_domain::{QueryParams, VariableValue};
use param_guard_ports::VariableStorePort;

/// Read `request.queryparam.<key>`.
pub fn get_query_param(store: &dyn VariableStorePort, key: &str) -> Option<VariableValue> {
    get_query_param_in(store, QUERY_PARAM_NAMESPACE, key)
}

/// Read `<namespace><key>`.
pub fn get_query_param_in(
    store: &dyn VariableStorePort,
    namespace: &str,
    key: &str,
) -> Option<VariableValue> {
    store.get_variable(&format!("{namespace}{key}"))
}

/// Read several query parameters, keeping the order of `keys`.
///
/// Unset parameters are kept with an absent value. Boolean values are
/// rendered as `"true"`/`"false"`; `Null` reads as absent.
pub fn get_query_params<I, K>(store: &dyn VariableStorePort, keys: I) -> QueryParams
where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    get_query_params_in(store, QUERY_PARAM_NAMESPACE, keys)
}

/// [`get_query_params`] with an explicit namespace.
pub fn get_query_params_in<I, K>(
    store: &dyn VariableStorePort,
    namespace: &str,
    keys: I,
) -> QueryParams
where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    let mut params = QueryParams::new();
    for key in keys {
        let key = key.as_ref();
        let value = get_query_param_in(store, namespace, key).and_then(into_param_value);
        params.insert(key, value);
    }
    params
}

fn into_param_value(value: VariableValue) -> Option<String> {
    match value {
        VariableValue::String(value) => Some(value),
        VariableValue::Bool(value) => Some(value.to_string()),
        VariableValue::Null => None,
    }
}

/// Write `<prefix>request.queryparam.<key>` unless `value` is `None`.
pub fn set_query_param(
    store: &dyn VariableStorePort,
    key: &str,
    value: Option<VariableValue>,
    prefix: &str,
) {
    set_query_param_in(store, QUERY_PARAM_NAMESPACE, key, value, prefix);
}

/// Write `<prefix><namespace><key>` unless `value` is `None`.
pub fn set_query_param_in(
    store: &dyn VariableStorePort,
    namespace: &str,
    key: &str,
    value: Option<VariableValue>,
    prefix: &str,
) {
    if let Some(value) = value {
        store.set_variable(&format!("{prefix}{namespace}{key}"), value);
    }
}

/// Write several query parameters, skipping `None` and `Null` values.
pub fn set_query_params<I, K>(store: &dyn VariableStorePort, params: I, prefix: &str)
where
    I: IntoIterator<Item = (K, Option<VariableValue>)>,
    K: AsRef<str>,
{
    for (key, value) in params {
        if let Some(value) = value.filter(|value| !value.is_null()) {
            set_query_param(store, key.as_ref(), Some(value), prefix);
        }
    }
}

/// Write `<prefix><key>` unless `value` is `None`. No namespace is applied.
pub fn set_variable(
    store: &dyn VariableStorePort,
    key: &str,
    value: Option<VariableValue>,
    prefix: &str,
) {
    if let Some(value) = value {
        store.set_variable(&format!("{prefix}{key}"), value);
    }
}

/// Write several raw variables, skipping `None` and `Null` values.
pub fn set_variables<I, K>(store: &dyn VariableStorePort, variables: I, prefix: &str)
where
    I: IntoIterator<Item = (K, Option<VariableValue>)>,
    K: AsRef<str>,
{
    for (key, value) in variables {
        if let Some(value) = value.filter(|value| !value.is_null()) {
            set_variable(store, key.as_ref(), Some(value), prefix);
        }
    }
}
