//! Service lifecycles.
//!
//! A lifecycle decides how often a service's producer runs:
//! - [`Lifecycle::Shared`] — once, then the value is cached until reset
//! - [`Lifecycle::Factory`] — on every resolution
use std::fmt;

/// Defines how a registered service hands out values.
///
/// # Examples
/// ```
/// use bowl_container::lifecycle::Lifecycle;
///
/// assert!(Lifecycle::Shared.is_cached());
/// assert!(!Lifecycle::Factory.is_cached());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// One instance, built on first resolve and kept until `reset`.
    ///
    /// Registered with `Container::share`.
    Shared,

    /// A fresh instance on every resolve. Never cached.
    ///
    /// Registered with `Container::factory`.
    Factory,
}

impl Lifecycle {
    /// Returns `true` if this lifecycle caches instances.
    #[inline]
    pub fn is_cached(&self) -> bool {
        matches!(self, Lifecycle::Shared)
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifecycle::Shared => write!(f, "Shared"),
            Lifecycle::Factory => write!(f, "Factory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_is_cached() {
        assert!(Lifecycle::Shared.is_cached());
        assert!(!Lifecycle::Factory.is_cached());
    }

    #[test]
    fn lifecycle_display() {
        assert_eq!(format!("{}", Lifecycle::Shared), "Shared");
        assert_eq!(format!("{}", Lifecycle::Factory), "Factory");
    }
}
