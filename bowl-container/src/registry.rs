//! Service registry — maps names and tags to service definitions.
//!
//! A name maps to exactly one definition. Registering the same name again
//! replaces the definition; the old one stays in any tag group it was
//! already added to.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::service::Service;
use crate::tagged::TaggedServices;

/// Stores all service definitions and tag groups of one container.
#[derive(Default)]
pub(crate) struct Registry {
    services: HashMap<String, Arc<dyn Service>>,
    tags: HashMap<String, TaggedServices>,
}

impl Registry {
    /// Registers a definition under `name` and appends it to each tag group,
    /// creating groups on first use.
    pub fn register<I, S>(&mut self, name: String, service: Arc<dyn Service>, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags {
            self.add_to_tag(tag.into(), service.clone());
        }

        debug!(name = %name, lifecycle = %service.lifecycle(), "Registered service");
        if self.services.insert(name, service).is_some() {
            trace!("Replaced previous definition");
        }
    }

    /// Appends a definition to a tag group.
    pub fn add_to_tag(&mut self, tag: String, service: Arc<dyn Service>) {
        trace!(tag = %tag, "Tagging service");
        self.tags.entry(tag).or_default().add(service);
    }

    /// Looks up a definition by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Service>> {
        self.services.get(name)
    }

    /// Looks up a tag group.
    pub fn tag(&self, tag: &str) -> Option<&TaggedServices> {
        self.tags.get(tag)
    }

    /// Copies every definition and tag member of `other` into this registry.
    ///
    /// Definitions overwrite same-named ones. Tag members are appended after
    /// the members already present, keeping `other`'s order.
    pub fn merge(&mut self, other: &Registry) {
        self.merge_services(other);
        self.merge_tags(other);
    }

    /// Copies every definition of `other`, overwriting same-named ones.
    pub fn merge_services(&mut self, other: &Registry) {
        for (name, service) in &other.services {
            self.services.insert(name.clone(), service.clone());
        }
    }

    /// Appends the members of `other`'s tag groups to this registry's groups.
    pub fn merge_tags(&mut self, other: &Registry) {
        for (tag, group) in &other.tags {
            let target = self.tags.entry(tag.clone()).or_default();
            for service in group.services() {
                target.add(service.clone());
            }
        }
    }

    /// Registered service names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.services.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Known tags, sorted.
    pub fn tag_names(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.tags.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Returns the number of registered services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{FactoryService, Instance, SharedService};

    fn dummy() -> Arc<dyn Service> {
        Arc::new(SharedService::new(Arc::new(|_| Ok(Arc::new(42i32) as Instance))))
    }

    const NO_TAGS: [&str; 0] = [];

    #[test]
    fn register_and_get() {
        let mut reg = Registry::default();
        reg.register("db".into(), dummy(), NO_TAGS);
        assert!(reg.get("db").is_some());
        assert!(reg.get("cache").is_none());
    }

    #[test]
    fn reregister_replaces() {
        let mut reg = Registry::default();
        reg.register("db".into(), dummy(), NO_TAGS);
        reg.register(
            "db".into(),
            Arc::new(FactoryService::new(Arc::new(|_| Ok(Arc::new(1i32) as Instance)))),
            NO_TAGS,
        );

        assert_eq!(reg.len(), 1);
        assert!(!reg.get("db").unwrap().lifecycle().is_cached());
    }

    #[test]
    fn tags_created_on_first_use() {
        let mut reg = Registry::default();
        reg.register("a".into(), dummy(), ["t", "u"]);
        reg.register("b".into(), dummy(), ["t"]);

        assert_eq!(reg.tag("t").map(TaggedServices::len), Some(2));
        assert_eq!(reg.tag("u").map(TaggedServices::len), Some(1));
        assert_eq!(reg.tag_names(), ["t", "u"]);
    }

    #[test]
    fn merge_appends_tags_and_overwrites_names() {
        let mut parent = Registry::default();
        let parent_a = dummy();
        parent.register("a".into(), parent_a.clone(), ["t"]);

        let mut child = Registry::default();
        let child_a = dummy();
        child.register("a".into(), child_a.clone(), ["t"]);
        child.register("b".into(), dummy(), ["t"]);

        parent.merge(&child);

        assert!(Arc::ptr_eq(parent.get("a").unwrap(), &child_a));
        let group = parent.tag("t").unwrap();
        assert_eq!(group.len(), 3);
        assert!(Arc::ptr_eq(&group.services()[0], &parent_a));
        assert!(Arc::ptr_eq(&group.services()[1], &child_a));
        assert_eq!(parent.names(), ["a", "b"]);
    }

    #[test]
    fn merge_services_leaves_tags_alone() {
        let mut parent = Registry::default();
        parent.register("a".into(), dummy(), ["t"]);

        let mut child = Registry::default();
        let child_a = dummy();
        child.register("a".into(), child_a.clone(), ["t"]);

        parent.merge_services(&child);

        assert!(Arc::ptr_eq(parent.get("a").unwrap(), &child_a));
        assert_eq!(parent.tag("t").map(TaggedServices::len), Some(1));
    }
}
