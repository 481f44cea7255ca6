use {
    crate::{Nodes, Ring, RouterError, RouterResult},
    parking_lot::RwLock,
    std::{collections::HashMap, sync::Arc},
};

/// Name of the system used when none is given.
pub const DEFAULT_SYSTEM: &str = "default";

/// Named pair of a lookup ring and a storage ring.
///
/// The lookup ring holds relocation pointers (key to storage node
/// identifier), the storage ring holds the values. A system is immutable once
/// built.
pub struct System<R: Ring> {
    lookup: R,
    storage: R,
    storage_nodes: Nodes<R::Node>,
}

impl<R: Ring> System<R> {
    /// Creates a system.
    ///
    /// `storage_nodes` resolves pointer values into storage nodes; it is
    /// expected to hold the nodes of `storage`.
    pub fn new(lookup: R, storage: R, storage_nodes: Nodes<R::Node>) -> Self {
        Self {
            lookup,
            storage,
            storage_nodes,
        }
    }

    pub fn lookup_ring(&self) -> &R {
        &self.lookup
    }

    pub fn storage_ring(&self) -> &R {
        &self.storage
    }

    /// Resolves a storage node identifier into a node.
    pub fn storage_node(&self, id: &str) -> Option<&R::Node> {
        self.storage_nodes.by_id(id)
    }
}

/// Collection of named systems.
///
/// Read-mostly: systems are looked up on every operation, and replaced only
/// when (re-)registered. Readers keep the system they fetched even if it gets
/// replaced meanwhile.
pub struct Registry<R: Ring> {
    systems: RwLock<HashMap<String, Arc<System<R>>>>,
}

impl<R: Ring> Default for Registry<R> {
    fn default() -> Self {
        Self {
            systems: RwLock::new(HashMap::new()),
        }
    }
}

impl<R: Ring> Registry<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a system under the given name, replacing any previous one.
    ///
    /// Returns the replaced system, if any.
    pub fn insert(&self, name: impl Into<String>, system: System<R>) -> Option<Arc<System<R>>> {
        self.systems.write().insert(name.into(), Arc::new(system))
    }

    /// Returns the system registered under the given name.
    pub fn get(&self, name: &str) -> RouterResult<Arc<System<R>>> {
        self.systems
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| RouterError::UnknownSystem(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.systems.read().contains_key(name)
    }

    /// Names of all registered systems, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.systems.read().keys().cloned().collect();
        names.sort();
        names
    }
}
