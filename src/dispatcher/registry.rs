use super::lineage::{clean_namespace, namespace_lineage};
use crate::action::{reverse_key, ActionId, ActionList};
use std::collections::HashMap;

/// Reverse-key index and per-namespace containers of registered actions.
///
/// Filled during setup only. The root container is snapshotted separately
/// so lookups walking toward the root see the actions present when setup
/// completed.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    actions: HashMap<String, ActionId>,
    containers: HashMap<String, ActionList>,
    root_actions: ActionList,
}

impl ActionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` under `key` and append it to its namespace container.
    /// Returns `false` (and changes nothing) when the key is taken.
    pub fn insert(&mut self, key: &str, namespace: &str, id: ActionId) -> bool {
        if self.actions.contains_key(key) {
            return false;
        }
        self.actions.insert(key.to_string(), id);
        self.containers
            .entry(namespace.to_string())
            .or_default()
            .push(id);
        true
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<ActionId> {
        self.actions.get(key).copied()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.actions.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Exact hit on `namespace/name`; the namespace is cleaned first
    #[must_use]
    pub fn lookup_by_key(&self, namespace: &str, name: &str) -> Option<ActionId> {
        self.get(&reverse_key(&clean_namespace(namespace), name))
    }

    /// Exact hit on a path with one leading slash stripped
    #[must_use]
    pub fn lookup_by_path(&self, path: &str) -> Option<ActionId> {
        self.get(path.strip_prefix('/').unwrap_or(path))
    }

    /// Freeze the current root container
    pub fn snapshot_root(&mut self) {
        self.root_actions = self.containers.get("").cloned().unwrap_or_default();
    }

    #[must_use]
    pub fn root_actions(&self) -> &[ActionId] {
        &self.root_actions
    }

    /// Actions declared directly in `namespace`
    #[must_use]
    pub fn container(&self, namespace: &str) -> &[ActionId] {
        self.containers.get(namespace).map_or(&[], Vec::as_slice)
    }

    /// Containers visible from `namespace`, most specific first, ending with
    /// the root snapshot.
    #[must_use]
    pub fn containers_for(&self, namespace: &str) -> ActionList {
        let namespace = clean_namespace(namespace);
        let mut ret = ActionList::new();
        for ns in namespace_lineage(&namespace) {
            ret.extend_from_slice(self.container(ns));
        }
        ret.extend_from_slice(&self.root_actions);
        ret
    }

    /// Every action called `name` visible from `namespace`, closest namespace
    /// first. `name_of` maps a handle to its action name.
    pub fn actions_in_namespace<'a, F>(&self, name: &str, namespace: &str, name_of: F) -> ActionList
    where
        F: Fn(ActionId) -> Option<&'a str>,
    {
        self.containers_for(namespace)
            .into_iter()
            .filter(|id| name_of(*id) == Some(name))
            .collect()
    }

    /// Registered keys in lexical order
    #[must_use]
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(i: usize) -> ActionId {
        ActionId::new(0, i)
    }

    #[test]
    fn test_insert_is_first_wins() {
        let mut reg = ActionRegistry::new();
        assert!(reg.insert("a/show", "a", id(0)));
        assert!(!reg.insert("a/show", "a", id(1)));
        assert_eq!(reg.get("a/show"), Some(id(0)));
        assert_eq!(reg.container("a"), [id(0)]);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_lookups() {
        let mut reg = ActionRegistry::new();
        assert!(reg.insert("a/b/show", "a/b", id(0)));
        assert!(reg.insert("index", "", id(1)));
        assert_eq!(reg.lookup_by_key("/a//b/", "show"), Some(id(0)));
        assert_eq!(reg.lookup_by_key("", "index"), Some(id(1)));
        assert_eq!(reg.lookup_by_path("/a/b/show"), Some(id(0)));
        assert_eq!(reg.lookup_by_path("index"), Some(id(1)));
        assert_eq!(reg.lookup_by_path("//index"), None);
    }

    #[test]
    fn test_root_snapshot_is_frozen() {
        let mut reg = ActionRegistry::new();
        assert!(reg.insert("index", "", id(0)));
        reg.snapshot_root();
        assert!(reg.insert("late", "", id(1)));
        assert_eq!(reg.root_actions(), [id(0)]);
        assert_eq!(reg.containers_for("x"), [id(0)]);
    }

    #[test]
    fn test_containers_walk_most_specific_first() {
        let mut reg = ActionRegistry::new();
        assert!(reg.insert("show", "", id(0)));
        assert!(reg.insert("a/show", "a", id(1)));
        assert!(reg.insert("a/b/show", "a/b", id(2)));
        assert!(reg.insert("a/b/other", "a/b", id(3)));
        assert!(reg.insert("x/show", "x", id(4)));
        reg.snapshot_root();

        assert_eq!(reg.containers_for("a/b"), [id(2), id(3), id(1), id(0)]);
        let names = ["show", "show", "show", "other", "show"];
        let found = reg.actions_in_namespace("show", "/a/b", |i| names.get(i.index()).copied());
        assert_eq!(found, [id(2), id(1), id(0)]);
    }

    #[test]
    fn test_sorted_keys() {
        let mut reg = ActionRegistry::new();
        assert!(reg.insert("b", "", id(0)));
        assert!(reg.insert("a/z", "a", id(1)));
        assert_eq!(reg.sorted_keys(), ["a/z", "b"]);
    }
}
