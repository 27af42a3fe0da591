//! # The Container — heart of Bowl
//!
//! Maps service names to lazily built values, groups services by tag,
//! keeps a parameter bag, and holds named environments that can be merged
//! in on activation.
//!
//! # Architecture
//! ```text
//! share / factory ──> Registry ──name──> Arc<dyn Service> ──get()──> Instance
//!                        │                    ▲
//!                        └──tag──> TaggedServices
//!
//! configure("dev") ──> child Container ──env("dev")──> merged into parent
//! ```
//!
//! # Examples
//! ```rust
//! use bowl_container::prelude::*;
//! use std::sync::Arc;
//!
//! struct Mailer {
//!     transport: Arc<String>,
//! }
//!
//! let mut bowl = Container::new();
//! bowl.share("mail.transport", |_| Ok(String::from("smtp")))
//!     .factory("mailer", |c| {
//!         Ok(Mailer { transport: c.get("mail.transport")? })
//!     });
//!
//! let mailer: Arc<Mailer> = bowl.get("mailer").unwrap();
//! assert_eq!(mailer.transport.as_str(), "smtp");
//! ```

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument, trace};

use crate::environment::{Activation, Environments};
use crate::error::{BowlError, Result};
use crate::lifecycle::Lifecycle;
use crate::parameters::Parameters;
use crate::provider::ServiceProvider;
use crate::registry::Registry;
use crate::service::{FactoryService, Instance, Producer, Service, SharedService};
use crate::tagged::Tagged;

const NO_TAGS: [&str; 0] = [];

/// Named-service dependency injection container.
///
/// Registration takes `&mut self`; resolution takes `&self`, which is also
/// what every producer receives, so producers can resolve their own
/// dependencies by name.
#[derive(Default)]
pub struct Container {
    registry: Registry,
    parameters: Parameters,
    environments: Environments,
}

impl Container {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Resolution ──

    /// Resolve a service by name and downcast it to `T`.
    ///
    /// ```rust,ignore
    /// let db: Arc<Database> = bowl.get("db")?;
    /// ```
    ///
    /// # Errors
    /// - [`BowlError::UndefinedService`] if `name` is not registered
    /// - [`BowlError::TypeMismatch`] if the value is not a `T`
    /// - whatever the producer returned, unchanged
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
        let instance = self.get_any(name)?;
        downcast(name, instance)
    }

    /// Resolve a service by name without downcasting.
    pub fn get_any(&self, name: &str) -> Result<Instance> {
        trace!(name, "Resolving");
        self.service(name)?.get(self)
    }

    /// Rebuild a service's cached value.
    ///
    /// Shared services run their producer right away; factory services
    /// are left alone.
    ///
    /// # Errors
    /// - [`BowlError::UndefinedService`] if `name` is not registered
    /// - whatever the producer returned; the old cached value is kept
    pub fn reset(&mut self, name: &str) -> Result<&mut Self> {
        debug!(name, "Resetting service");
        let service = self.service(name)?.clone();
        service.reset(self)?;
        Ok(self)
    }

    // ── Registration ──

    /// Register a shared service: built once, then cached.
    pub fn share<T, F>(&mut self, name: impl Into<String>, producer: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        self.share_tagged(name, producer, NO_TAGS)
    }

    /// Register a shared service and add it to each tag's group.
    pub fn share_tagged<T, F, I, S>(
        &mut self,
        name: impl Into<String>,
        producer: F,
        tags: I,
    ) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let service = Arc::new(SharedService::new(erase(producer)));
        self.register_service(name, service, tags)
    }

    /// Register a factory service: built on every resolve.
    pub fn factory<T, F>(&mut self, name: impl Into<String>, producer: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        self.factory_tagged(name, producer, NO_TAGS)
    }

    /// Register a factory service and add it to each tag's group.
    pub fn factory_tagged<T, F, I, S>(
        &mut self,
        name: impl Into<String>,
        producer: F,
        tags: I,
    ) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let service = Arc::new(FactoryService::new(erase(producer)));
        self.register_service(name, service, tags)
    }

    /// Register a ready-made definition under `name` and the given tags.
    ///
    /// An existing definition with the same name is replaced.
    pub fn register_service<I, S>(
        &mut self,
        name: impl Into<String>,
        service: Arc<dyn Service>,
        tags: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry.register(name.into(), service, tags);
        self
    }

    /// Add a [`ServiceProvider`] module.
    pub fn register_provider(&mut self, provider: &dyn ServiceProvider) -> &mut Self {
        debug!(provider = provider.name(), "Registering provider");
        provider.register(self);
        self
    }

    // ── Extension ──

    /// Decorate a service: future builds pass the previous producer's
    /// value through `decorator`.
    ///
    /// Extensions stack in call order. A value already cached by a shared
    /// service is kept until the service is reset.
    ///
    /// # Errors
    /// [`BowlError::UndefinedService`] if `name` is not registered.
    pub fn extend<T, U, F>(&mut self, name: &str, decorator: F) -> Result<&mut Self>
    where
        T: Any + Send + Sync,
        U: Any + Send + Sync,
        F: Fn(&Container, Arc<T>) -> Result<U> + Send + Sync + 'static,
    {
        let key = name.to_string();
        self.extend_any(name, move |container: &Container, base: Instance| {
            let base = downcast::<T>(&key, base)?;
            Ok(Arc::new(decorator(container, base)?) as Instance)
        })
    }

    /// Untyped variant of [`extend`](Self::extend).
    pub fn extend_any<F>(&mut self, name: &str, decorator: F) -> Result<&mut Self>
    where
        F: Fn(&Container, Instance) -> Result<Instance> + Send + Sync + 'static,
    {
        let service = self.service(name)?;
        let parent = service.producer();

        service.set_producer(Arc::new(move |container: &Container| {
            let base = parent(container)?;
            decorator(container, base)
        }));

        debug!(name, "Extended service");
        Ok(self)
    }

    // ── Tags ──

    /// Look up the group of services registered under `tag`.
    ///
    /// # Errors
    /// [`BowlError::UndefinedTag`] if no registration used `tag`.
    pub fn get_tagged_services<'c>(&'c self, tag: &'c str) -> Result<Tagged<'c>> {
        let group = self
            .registry
            .tag(tag)
            .ok_or_else(|| BowlError::undefined_tag(tag, &self.registry.tag_names()))?;

        Ok(Tagged::new(tag, group, self))
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.registry.tag(tag).is_some()
    }

    /// Known tags, sorted.
    pub fn tag_names(&self) -> Vec<&str> {
        self.registry.tag_names()
    }

    // ── Environments ──

    /// Fill the environment `name` with registrations.
    ///
    /// The environment's container is created on first use; later calls
    /// with the same name add to it. `configure` runs immediately.
    ///
    /// ```rust
    /// use bowl_container::prelude::*;
    ///
    /// let mut bowl = Container::new();
    /// bowl.set_parameter("debug", false);
    /// bowl.configure("dev", |dev| {
    ///     dev.set_parameter("debug", true);
    /// });
    ///
    /// bowl.env("dev").unwrap();
    /// assert!(*bowl.parameter::<bool>("debug").unwrap());
    /// ```
    pub fn configure<F>(&mut self, name: &str, configure: F) -> &mut Self
    where
        F: FnOnce(&mut Container),
    {
        debug!(environment = name, "Configuring environment");
        configure(self.environments.entry(name));
        self
    }

    /// Activate the environment `name`, merging its parameters, services
    /// and tags into this container.
    ///
    /// Parameters and services overwrite same-named entries. Tag members
    /// are appended after the ones already registered here. Activating the
    /// active environment again re-applies its parameters and services but
    /// leaves tag groups as they are.
    ///
    /// # Errors
    /// - [`BowlError::UndefinedEnvironment`] if `name` was never configured
    /// - [`BowlError::AlreadyActivated`] if a different environment is active
    #[instrument(skip(self), name = "activate_environment")]
    pub fn env(&mut self, name: &str) -> Result<()> {
        let (child, activation) = self.environments.activate(name)?;

        for (key, value) in child.parameters.iter() {
            self.parameters.set_raw(key, value.clone());
        }
        match activation {
            Activation::First => self.registry.merge(&child.registry),
            Activation::Repeat => self.registry.merge_services(&child.registry),
        }

        info!(
            environment = name,
            services = child.registry.len(),
            parameters = child.parameters.len(),
            "Environment activated"
        );
        Ok(())
    }

    /// The activated environment, if any.
    pub fn active_environment(&self) -> Option<&str> {
        self.environments.active()
    }

    pub fn has_environment(&self, name: &str) -> bool {
        self.environments.contains(name)
    }

    /// Configured environment names, sorted.
    pub fn environment_names(&self) -> Vec<&str> {
        self.environments.names()
    }

    // ── Parameters ──

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    /// Store a parameter value.
    pub fn set_parameter<T: Any + Send + Sync>(
        &mut self,
        key: impl Into<String>,
        value: T,
    ) -> &mut Self {
        self.parameters.set(key, value);
        self
    }

    /// Read a parameter value as `T`.
    pub fn parameter<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>> {
        self.parameters.get_as(key)
    }

    // ── Introspection ──

    /// Returns `true` if a service is registered under `name`.
    pub fn has(&self, name: &str) -> bool {
        self.registry.get(name).is_some()
    }

    /// Registered service names, sorted.
    pub fn service_names(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// Lifecycle of the service registered under `name`.
    pub fn lifecycle_of(&self, name: &str) -> Result<Lifecycle> {
        Ok(self.service(name)?.lifecycle())
    }

    // ── Internal ──

    fn service(&self, name: &str) -> Result<&Arc<dyn Service>> {
        self.registry
            .get(name)
            .ok_or_else(|| BowlError::undefined_service(name, &self.registry.names()))
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("services", &self.registry.len())
            .field("tags", &self.registry.tag_count())
            .field("parameters", &self.parameters.len())
            .field("active_environment", &self.environments.active())
            .finish()
    }
}

/// Wraps a typed producer into a type-erased [`Producer`].
fn erase<T, F>(producer: F) -> Producer
where
    T: Any + Send + Sync,
    F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
{
    Arc::new(move |container: &Container| Ok(Arc::new(producer(container)?) as Instance))
}

fn downcast<T: Any + Send + Sync>(name: &str, instance: Instance) -> Result<Arc<T>> {
    instance.downcast::<T>().map_err(|_| BowlError::TypeMismatch {
        name: name.to_string(),
        expected: type_name::<T>(),
    })
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::Container;
    pub use crate::error::{BowlError, Result};
    pub use crate::lifecycle::Lifecycle;
    pub use crate::parameters::Parameters;
    pub use crate::provider::ServiceProvider;
    pub use crate::service::{FactoryService, Instance, Producer, Service, SharedService};
    pub use crate::tagged::{Tagged, TaggedServices};
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
