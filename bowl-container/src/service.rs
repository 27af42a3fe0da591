//! Service definitions: a producer plus a lifecycle.
//!
//! A definition owns the producer closure that builds a value and decides
//! whether that value is cached ([`SharedService`]) or rebuilt on every
//! resolve ([`FactoryService`]).
//!
//! Definitions are handed around as `Arc<dyn Service>`: the same
//! definition is referenced by the name registry and by every tag group
//! it was registered under, so a reset or an extension is visible through
//! all of them.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use tracing::trace;

use crate::container::Container;
use crate::error::Result;
use crate::lifecycle::Lifecycle;

/// A resolved, type-erased service value.
///
/// Two resolutions returned the same instance when `Arc::ptr_eq` holds.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Type alias for producer closures.
///
/// A producer receives the resolving [`Container`] (to look up its own
/// dependencies by name) and returns a fresh [`Instance`] or an error.
///
/// # Why `Arc` and not `Box`?
/// `extend` wraps the current producer inside a new one, and the
/// definition hands out clones so its producer lock is not held while a
/// producer runs.
pub type Producer = Arc<dyn Fn(&Container) -> Result<Instance> + Send + Sync>;

/// A registered service definition.
pub trait Service: Send + Sync {
    /// Resolves the service's value.
    ///
    /// Producers may resolve other services. A shared service resolving
    /// itself, directly or through a cycle, deadlocks on its first build.
    fn get(&self, container: &Container) -> Result<Instance>;

    /// Drops whatever the lifecycle has cached.
    ///
    /// For shared services this rebuilds the value immediately.
    fn reset(&self, container: &Container) -> Result<()>;

    /// Returns the current producer.
    fn producer(&self) -> Producer;

    /// Replaces the producer. Already cached values are kept.
    fn set_producer(&self, producer: Producer);

    /// Returns the lifecycle of this definition.
    fn lifecycle(&self) -> Lifecycle;
}

/// Caches the first produced value and returns it until reset.
pub struct SharedService {
    producer: RwLock<Producer>,
    cache: RwLock<Arc<OnceCell<Instance>>>,
}

impl SharedService {
    pub fn new(producer: Producer) -> Self {
        Self {
            producer: RwLock::new(producer),
            cache: RwLock::new(Arc::new(OnceCell::new())),
        }
    }

    /// Returns `true` if a value has been built and cached.
    pub fn is_cached(&self) -> bool {
        self.cache.read().get().is_some()
    }

    fn produce(&self, container: &Container) -> Result<Instance> {
        let producer = self.producer();
        producer(container)
    }
}

impl Service for SharedService {
    fn get(&self, container: &Container) -> Result<Instance> {
        // Clone the cell out so the registry-side lock is released first.
        let cell = self.cache.read().clone();

        if let Some(instance) = cell.get() {
            trace!("Shared service cache hit");
            return Ok(instance.clone());
        }

        // A failing producer leaves the cell empty. The cell's init lock is
        // held while the producer runs: resolving this same service from
        // inside its own producer blocks forever.
        cell.get_or_try_init(|| self.produce(container)).cloned()
    }

    fn reset(&self, container: &Container) -> Result<()> {
        let instance = self.produce(container)?;
        *self.cache.write() = Arc::new(OnceCell::with_value(instance));
        Ok(())
    }

    fn producer(&self) -> Producer {
        self.producer.read().clone()
    }

    fn set_producer(&self, producer: Producer) {
        *self.producer.write() = producer;
    }

    fn lifecycle(&self) -> Lifecycle {
        Lifecycle::Shared
    }
}

impl fmt::Debug for SharedService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedService")
            .field("cached", &self.is_cached())
            .finish()
    }
}

/// Runs the producer on every resolve.
pub struct FactoryService {
    producer: RwLock<Producer>,
}

impl FactoryService {
    pub fn new(producer: Producer) -> Self {
        Self {
            producer: RwLock::new(producer),
        }
    }
}

impl Service for FactoryService {
    fn get(&self, container: &Container) -> Result<Instance> {
        let producer = self.producer();
        producer(container)
    }

    fn reset(&self, _container: &Container) -> Result<()> {
        Ok(())
    }

    fn producer(&self) -> Producer {
        self.producer.read().clone()
    }

    fn set_producer(&self, producer: Producer) {
        *self.producer.write() = producer;
    }

    fn lifecycle(&self) -> Lifecycle {
        Lifecycle::Factory
    }
}

impl fmt::Debug for FactoryService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryService").finish()
    }
}

impl fmt::Debug for dyn Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("lifecycle", &self.lifecycle())
            .finish()
    }
}
