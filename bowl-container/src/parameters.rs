//! Parameter bag — plain configuration values kept beside the services.
//!
//! Parameters are not built or cached; they are stored as given and
//! returned as-is. Iteration follows insertion order.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use crate::error::{BowlError, Result};

/// A stored parameter value.
pub type Parameter = Arc<dyn Any + Send + Sync>;

/// Insertion-ordered key → value store.
///
/// # Examples
/// ```
/// use bowl_container::parameters::Parameters;
///
/// let mut params = Parameters::new();
/// params.set("db.host", "localhost");
/// params.set("db.port", 5432u16);
///
/// assert_eq!(*params.get_as::<u16>("db.port").unwrap(), 5432);
/// assert_eq!(params.keys().collect::<Vec<_>>(), ["db.host", "db.port"]);
/// ```
#[derive(Default, Clone)]
pub struct Parameters {
    entries: Vec<(String, Parameter)>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw value stored under `key`.
    ///
    /// # Errors
    /// [`BowlError::UndefinedParameter`] if the key is absent.
    pub fn get(&self, key: &str) -> Result<Parameter> {
        self.position(key)
            .map(|i| self.entries[i].1.clone())
            .ok_or_else(|| BowlError::UndefinedParameter(key.to_string()))
    }

    /// Returns the value stored under `key`, downcast to `T`.
    pub fn get_as<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>> {
        self.get(key)?
            .downcast::<T>()
            .map_err(|_| BowlError::TypeMismatch {
                name: key.to_string(),
                expected: type_name::<T>(),
            })
    }

    /// Stores a value. An existing key keeps its position.
    pub fn set<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.set_raw(key, Arc::new(value));
    }

    /// Stores an already type-erased value.
    pub fn set_raw(&mut self, key: impl Into<String>, value: Parameter) {
        let key = key.into();
        match self.position(&key) {
            Some(i) => self.entries[i].1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Removes a key, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<Parameter> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    /// Iterates over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Parameter)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}

impl fmt::Debug for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}
