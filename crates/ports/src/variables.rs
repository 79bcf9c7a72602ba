//! Host variable store boundary contract.

use param_guard_domain::VariableValue;

/// Request-scoped key/value context owned by the gateway host.
///
/// Variable names are flat strings (e.g. `request.queryparam.limit`). The
/// store is owned per request; implementations use interior mutability so a
/// shared reference can both read and write.
pub trait VariableStorePort: Send + Sync {
    /// Read a variable. `None` when the variable is unset.
    fn get_variable(&self, name: &str) -> Option<VariableValue>;

    /// Write a variable, replacing any previous value.
    fn set_variable(&self, name: &str, value: VariableValue);
}

impl<T: VariableStorePort + ?Sized> VariableStorePort for &T {
    fn get_variable(&self, name: &str) -> Option<VariableValue> {
        (**self).get_variable(name)
    }

    fn set_variable(&self, name: &str, value: VariableValue) {
        (**self).set_variable(name, value);
    }
}
