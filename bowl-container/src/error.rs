//! Error types for Bowl container operations.
//!
//! Every error raised by the container carries the offending service,
//! tag, environment or parameter name. Errors produced by user
//! producers travel through the container untouched.

use std::fmt;

use bowl_support::rendering::render_list;

/// Main error type for all Bowl operations.
#[derive(Debug, thiserror::Error)]
pub enum BowlError {
    /// Requested service name was never registered.
    #[error("{}", .0)]
    UndefinedService(UndefinedError),

    /// Requested tag was never referenced by a registration.
    #[error("{}", .0)]
    UndefinedTag(UndefinedError),

    /// Requested environment was never configured.
    #[error("Undefined environment: {0:?}")]
    UndefinedEnvironment(String),

    /// A different environment has already been activated.
    #[error(
        "Environment {active:?} is already active, cannot activate {requested:?}"
    )]
    AlreadyActivated { active: String, requested: String },

    /// Requested parameter key is not in the parameter bag.
    #[error("Undefined parameter: {0:?}")]
    UndefinedParameter(String),

    /// The stored value is not of the requested type.
    ///
    /// `name` is the service name or parameter key that was read. For a
    /// tag member it is the tag plus position, e.g. `"listener[1]"`.
    #[error("Type mismatch for {name:?}: expected {expected}")]
    TypeMismatch { name: String, expected: &'static str },

    /// A producer or decorator failed while building a value.
    #[error("{0}")]
    Producer(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl BowlError {
    /// Wraps an arbitrary error raised inside a producer.
    ///
    /// ```
    /// use bowl_container::BowlError;
    ///
    /// let err = BowlError::producer(std::io::Error::other("connection refused"));
    /// assert_eq!(err.to_string(), "connection refused");
    /// ```
    pub fn producer(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        BowlError::Producer(err.into())
    }

    pub(crate) fn undefined_service(name: &str, known: &[&str]) -> Self {
        BowlError::UndefinedService(UndefinedError::new("service", name, known))
    }

    pub(crate) fn undefined_tag(name: &str, known: &[&str]) -> Self {
        BowlError::UndefinedTag(UndefinedError::new("tag", name, known))
    }
}

/// Error for a service or tag lookup that found nothing.
///
/// Includes close matches among the registered names.
#[derive(Debug)]
pub struct UndefinedError {
    /// What kind of name was looked up ("service" or "tag")
    pub kind: &'static str,
    /// The name that was requested
    pub requested: String,
    /// Registered names that look similar
    pub suggestions: Vec<String>,
}

impl UndefinedError {
    fn new(kind: &'static str, requested: &str, known: &[&str]) -> Self {
        Self {
            kind,
            requested: requested.to_string(),
            suggestions: bowl_support::rendering::suggest_similar(requested, known, 3),
        }
    }
}

impl fmt::Display for UndefinedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Undefined {}: {:?}", self.kind, self.requested)?;

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of: {}", render_list(&self.suggestions))?;
        }

        Ok(())
    }
}

/// Convenient Result type for Bowl operations.
pub type Result<T> = std::result::Result<T, BowlError>;
