//! Tag groups — ordered collections of service definitions sharing a tag.
//!
//! [`TaggedServices`] is what the container stores per tag: an append-only
//! list of definitions in registration order. [`Tagged`] is what callers
//! get back from `Container::get_tagged_services`: the same list paired
//! with the container, resolving each member lazily while iterating.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use crate::container::Container;
use crate::error::{BowlError, Result};
use crate::service::{Instance, Service};

/// Append-only list of definitions registered under one tag.
///
/// The same definition may appear more than once; members are never
/// deduplicated.
#[derive(Default, Clone)]
pub struct TaggedServices {
    services: Vec<Arc<dyn Service>>,
}

impl TaggedServices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a definition to the end of the group.
    pub fn add(&mut self, service: Arc<dyn Service>) {
        self.services.push(service);
    }

    /// Number of members, counting repeated definitions.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// The member definitions themselves, in insertion order.
    pub fn services(&self) -> &[Arc<dyn Service>] {
        &self.services
    }
}

impl fmt::Debug for TaggedServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaggedServices")
            .field("len", &self.services.len())
            .finish()
    }
}

/// A tag group bound to the container that resolves its members.
///
/// # Examples
/// ```
/// use bowl_container::prelude::*;
///
/// let mut bowl = Container::new();
/// bowl.share_tagged("handler.a", |_| Ok("A"), ["handler"]);
/// bowl.share_tagged("handler.b", |_| Ok("B"), ["handler"]);
///
/// let handlers = bowl.get_tagged_services("handler").unwrap();
/// assert_eq!(handlers.len(), 2);
///
/// let names: Vec<&str> = handlers
///     .iter_as::<&str>()
///     .map(|h| *h.unwrap())
///     .collect();
/// assert_eq!(names, ["A", "B"]);
/// ```
#[derive(Clone, Copy)]
pub struct Tagged<'c> {
    tag: &'c str,
    group: &'c TaggedServices,
    container: &'c Container,
}

impl<'c> Tagged<'c> {
    pub(crate) fn new(tag: &'c str, group: &'c TaggedServices, container: &'c Container) -> Self {
        Self { tag, group, container }
    }

    /// The tag this group was looked up by.
    pub fn tag(&self) -> &'c str {
        self.tag
    }

    pub fn len(&self) -> usize {
        self.group.len()
    }

    pub fn is_empty(&self) -> bool {
        self.group.is_empty()
    }

    /// Resolves members one at a time, in insertion order.
    ///
    /// Every pass resolves again, so factory members yield fresh values.
    pub fn iter(&self) -> impl Iterator<Item = Result<Instance>> + use<'c> {
        let container = self.container;
        self.group
            .services()
            .iter()
            .map(move |service| service.get(container))
    }

    /// Like [`iter`](Self::iter), downcasting each value to `T`.
    ///
    /// A member of the wrong type fails with [`BowlError::TypeMismatch`]
    /// whose `name` is the tag and member position, e.g. `"listener[1]"`.
    pub fn iter_as<T: Any + Send + Sync>(
        &self,
    ) -> impl Iterator<Item = Result<Arc<T>>> + use<'c, T> {
        let tag = self.tag;
        self.iter().enumerate().map(move |(index, instance)| {
            instance?.downcast::<T>().map_err(|_| BowlError::TypeMismatch {
                name: format!("{tag}[{index}]"),
                expected: type_name::<T>(),
            })
        })
    }

    /// Resolves every member, stopping at the first error.
    pub fn resolve_all(&self) -> Result<Vec<Instance>> {
        self.iter().collect()
    }

    /// The unresolved member definitions.
    pub fn services(&self) -> &'c [Arc<dyn Service>] {
        self.group.services()
    }
}

impl<'c> IntoIterator for Tagged<'c> {
    type Item = Result<Instance>;
    type IntoIter = Box<dyn Iterator<Item = Result<Instance>> + 'c>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl fmt::Debug for Tagged<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tagged")
            .field("tag", &self.tag)
            .field("len", &self.group.len())
            .finish()
    }
}
