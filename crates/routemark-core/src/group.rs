//! Route groups
//!
//! A group bundles a path prefix and a tag. Groups are either registered up
//! front by the host or created lazily the first time a `@Group` marker names
//! them.

use crate::model::GroupMetadata;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Global group registry
static GLOBAL_GROUPS: OnceCell<GroupRegistry> = OnceCell::new();

/// Prefix a lazily created group receives: `/` followed by the lowercased name
pub fn default_prefix(name: &str) -> String {
    format!("/{}", name.to_lowercase())
}

/// Description a lazily created group receives
pub fn default_description(name: &str) -> String {
    format!("Group {name}")
}

/// Name-keyed set of groups
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: RwLock<BTreeMap<String, GroupMetadata>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide group registry
    pub fn global() -> &'static GroupRegistry {
        GLOBAL_GROUPS.get_or_init(GroupRegistry::new)
    }

    /// Register a group, replacing any group with the same name
    pub fn register(
        &self,
        name: impl Into<String>,
        prefix: impl Into<String>,
        description: impl Into<String>,
    ) -> Option<GroupMetadata> {
        let group = GroupMetadata::new(name, prefix, description);
        tracing::trace!(group = %group.name, prefix = %group.prefix, "group registered");
        self.groups.write().insert(group.name.clone(), group)
    }

    pub fn get(&self, name: &str) -> Option<GroupMetadata> {
        self.groups.read().get(name).cloned()
    }

    /// Return the named group, creating it if it does not exist yet
    ///
    /// `prefix` and `description` only apply on creation; an existing group
    /// is returned unchanged.
    pub fn resolve(
        &self,
        name: &str,
        prefix: Option<&str>,
        description: Option<&str>,
    ) -> GroupMetadata {
        if let Some(group) = self.get(name) {
            return group;
        }

        let mut groups = self.groups.write();
        groups
            .entry(name.to_string())
            .or_insert_with(|| {
                let prefix = prefix
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| default_prefix(name));
                let description = description
                    .filter(|d| !d.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| default_description(name));
                tracing::debug!(group = %name, prefix = %prefix, "group created");
                GroupMetadata::new(name, prefix, description)
            })
            .clone()
    }

    /// Every group, ordered by name
    pub fn all(&self) -> Vec<GroupMetadata> {
        self.groups.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.groups.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.read().is_empty()
    }

    /// Drop every group
    #[cfg(any(test, feature = "testing"))]
    #[doc(hidden)]
    pub fn reset(&self) {
        self.groups.write().clear();
    }
}

#[cfg(test)]
#[path = "group/group_tests.rs"]
mod group_tests;
