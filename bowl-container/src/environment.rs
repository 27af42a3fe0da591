//! Named environments — deferred bundles of overrides.
//!
//! Each environment is an independent child [`Container`] filled in by
//! `Container::configure`. Activating one merges it into the owning
//! container. A container activates at most one environment in its
//! lifetime:
//!
//! ```text
//! NoEnvironment ──env("dev")──> Active("dev") ──env("dev")──> Active("dev")
//!                                    │
//!                               env("prod") ──> AlreadyActivated
//! ```

use std::collections::HashMap;

use tracing::debug;

use crate::container::Container;
use crate::error::{BowlError, Result};

/// Whether an activation is the first one for this container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Activation {
    /// Nothing was active; parameters, services and tags are merged.
    First,
    /// The same environment was already active; tag members were merged
    /// before and must not be appended again.
    Repeat,
}

/// Environment registry and activation state of one container.
#[derive(Default)]
pub(crate) struct Environments {
    configs: HashMap<String, Container>,
    active: Option<String>,
}

impl Environments {
    /// Returns the child container for `name`, creating it on first use.
    pub fn entry(&mut self, name: &str) -> &mut Container {
        if !self.configs.contains_key(name) {
            debug!(environment = name, "Creating environment");
        }
        self.configs.entry(name.to_string()).or_default()
    }

    /// Validates and records activation of `name`, returning the child
    /// container to merge and whether it was merged before.
    ///
    /// # Errors
    /// - [`BowlError::UndefinedEnvironment`] if `name` was never configured
    /// - [`BowlError::AlreadyActivated`] if another environment is active
    pub fn activate(&mut self, name: &str) -> Result<(&Container, Activation)> {
        let child = self
            .configs
            .get(name)
            .ok_or_else(|| BowlError::UndefinedEnvironment(name.to_string()))?;

        let activation = match &self.active {
            Some(active) if active != name => {
                return Err(BowlError::AlreadyActivated {
                    active: active.clone(),
                    requested: name.to_string(),
                });
            }
            Some(_) => {
                debug!(environment = name, "Environment already active, re-applying overrides");
                Activation::Repeat
            }
            None => {
                self.active = Some(name.to_string());
                Activation::First
            }
        };

        Ok((child, activation))
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.configs.contains_key(name)
    }

    /// Configured environment names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.configs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_is_created_once() {
        let mut envs = Environments::default();
        envs.entry("dev").set_parameter("a", 1);
        envs.entry("dev").set_parameter("b", 2);

        assert!(envs.contains("dev"));
        assert_eq!(envs.names(), ["dev"]);
        assert_eq!(envs.entry("dev").parameters().len(), 2);
    }

    #[test]
    fn activate_unknown_fails_without_state_change() {
        let mut envs = Environments::default();
        assert!(matches!(
            envs.activate("missing"),
            Err(BowlError::UndefinedEnvironment(name)) if name == "missing"
        ));
        assert_eq!(envs.active(), None);
    }

    #[test]
    fn activation_is_sticky() {
        let mut envs = Environments::default();
        envs.entry("dev");
        envs.entry("prod");

        assert!(matches!(envs.activate("dev"), Ok((_, Activation::First))));
        assert!(matches!(envs.activate("dev"), Ok((_, Activation::Repeat))));

        match envs.activate("prod") {
            Err(BowlError::AlreadyActivated { active, requested }) => {
                assert_eq!(active, "dev");
                assert_eq!(requested, "prod");
            }
            other => panic!("Expected AlreadyActivated, got: {other:?}"),
        }
        assert_eq!(envs.active(), Some("dev"));
    }
}
