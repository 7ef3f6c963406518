//! Parameter store interface and the in-memory implementation.
//!
//! The live driver exposes each parameter under its own name; writing one
//! never touches another. [`ParameterStore`] is that interface, and
//! [`MemoryStore`] backs tests, the command-line tool and JSON snapshots.

use std::collections::BTreeMap;

use leetaccel_errors::ConfigError;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::name::{ParamName, ParamValue};

/// Get/set access to named driver parameters.
///
/// Implementations are shared between a configuration thread and readers,
/// so both methods take `&self`.
pub trait ParameterStore {
    /// Read one parameter.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] when the parameter was never written,
    /// [`ConfigError::Store`] for backend failures.
    fn get(&self, name: ParamName) -> Result<ParamValue, ConfigError>;

    /// Write one parameter.
    ///
    /// # Errors
    ///
    /// [`ConfigError::TypeMismatch`] when `value` has the wrong shape for
    /// `name`, [`ConfigError::Store`] for backend failures.
    fn set(&self, name: ParamName, value: ParamValue) -> Result<(), ConfigError>;
}

impl<S: ParameterStore + ?Sized> ParameterStore for &S {
    fn get(&self, name: ParamName) -> Result<ParamValue, ConfigError> {
        (**self).get(name)
    }

    fn set(&self, name: ParamName, value: ParamValue) -> Result<(), ConfigError> {
        (**self).set(name, value)
    }
}

/// Parameters held in memory, keyed by name.
///
/// ```
/// use leetaccel_config::{MemoryStore, ParamName, ParamValue, ParameterStore};
///
/// let store = MemoryStore::new();
/// store.set(ParamName::Sensitivity, ParamValue::Scalar(1.5))?;
/// assert_eq!(store.get(ParamName::Sensitivity)?, ParamValue::Scalar(1.5));
/// assert!(store.get(ParamName::Offset).is_err());
/// # Ok::<(), leetaccel_errors::ConfigError>(())
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<ParamName, ParamValue>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of parameters written so far.
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// True when nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }

    /// Remove a parameter, returning its old value.
    pub fn remove(&self, name: ParamName) -> Option<ParamValue> {
        self.values.write().remove(&name)
    }

    /// Copy of every stored value.
    pub fn snapshot(&self) -> BTreeMap<ParamName, ParamValue> {
        self.values.read().clone()
    }

    /// Serialize the current values as a JSON object keyed by parameter name.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Store`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(&*self.values.read())
            .map_err(|e| ConfigError::store(format!("failed to serialize store: {e}")))
    }

    /// Build a store from [`Self::to_json`] output.
    ///
    /// Every entry is checked against its parameter's value shape.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Store`] for malformed JSON,
    /// [`ConfigError::TypeMismatch`] for a value of the wrong shape.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let values: BTreeMap<ParamName, ParamValue> = serde_json::from_str(json)
            .map_err(|e| ConfigError::store(format!("failed to parse store: {e}")))?;
        for (name, value) in &values {
            check_kind(*name, value)?;
        }
        debug!(entries = values.len(), "Loaded parameter store snapshot");
        Ok(Self {
            values: RwLock::new(values),
        })
    }
}

impl ParameterStore for MemoryStore {
    fn get(&self, name: ParamName) -> Result<ParamValue, ConfigError> {
        self.values
            .read()
            .get(&name)
            .cloned()
            .ok_or(ConfigError::Missing(name.as_str()))
    }

    fn set(&self, name: ParamName, value: ParamValue) -> Result<(), ConfigError> {
        if let Err(e) = check_kind(name, &value) {
            warn!(parameter = %name, error = %e, "Rejected parameter write");
            return Err(e);
        }
        self.values.write().insert(name, value);
        Ok(())
    }
}

fn check_kind(name: ParamName, value: &ParamValue) -> Result<(), ConfigError> {
    let expected = name.expected_kind();
    if value.kind() == expected {
        Ok(())
    } else {
        Err(ConfigError::type_mismatch(
            name.as_str(),
            expected.as_str(),
            value.kind().as_str(),
        ))
    }
}
