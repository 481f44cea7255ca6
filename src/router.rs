
use {
    crate::{
        ClusterConfig,
        Connector,
        DEFAULT_SYSTEM,
        HrwRing,
        Node,
        Pools,
        Registry,
        Ring,
        RingBuilder,
        RingRole,
        RouterError,
        RouterResult,
        System,
        config::classify,
    },
    bytes::Bytes,
    std::sync::Arc,
    tracing::{debug, info, warn},
};

fn fetch<N: Node>(node: &N, key: &[u8]) -> RouterResult<Option<Bytes>> {
    node.get(key)
        .map_err(|source| RouterError::backend(node.id(), source))
}

fn store<N: Node>(node: &N, key: &[u8], value: Bytes) -> RouterResult<()> {
    node.set(key, value)
        .map_err(|source| RouterError::backend(node.id(), source))
}

fn remove<N: Node>(node: &N, key: &[u8]) -> RouterResult<()> {
    node.delete(key)
        .map_err(|source| RouterError::backend(node.id(), source))
}

/// Pointer resolution and value operations.
///
/// A key's value lives on its direct storage placement unless a pointer in
/// the lookup ring says otherwise. Pointers are read from at most the first
/// two lookup candidates: a pointer found on the second candidate is moved to
/// the first one before being used.
impl<R: Ring> System<R> {
    /// Finds the storage node a key's pointer refers to.
    ///
    /// Returns `None` if neither of the first two lookup candidates holds a
    /// pointer for the key, or if the pointer names a node unknown to the
    /// storage ring.
    pub fn locate_node(&self, key: &[u8]) -> RouterResult<Option<&R::Node>> {
        let mut candidates = self.lookup_ring().iterate_nodes(key);

        let Some(primary) = candidates.next() else {
            return Ok(None);
        };
        if let Some(pointer) = fetch(primary, key)? {
            return Ok(self.resolve(key, &pointer));
        }

        let Some(secondary) = candidates.next() else {
            return Ok(None);
        };
        match fetch(secondary, key)? {
            Some(pointer) => self.clean_up_ring(key, pointer),
            None => Ok(None),
        }
    }

    /// Same as [`locate_node()`](Self::locate_node), but assigns the key its
    /// direct storage placement (and records it in the lookup ring) when no
    /// pointer exists yet.
    pub fn locate_node_or_init(&self, key: &[u8]) -> RouterResult<&R::Node> {
        if let Some(node) = self.locate_node(key)? {
            return Ok(node);
        }

        let node = self
            .storage_ring()
            .get_node(key)
            .ok_or(RouterError::EmptyRing(RingRole::Storage))?;
        let lookup = self
            .lookup_ring()
            .get_node(key)
            .ok_or(RouterError::EmptyRing(RingRole::Lookup))?;

        debug!(lookup = lookup.id(), storage = node.id(), "Recording placement");
        store(lookup, key, Bytes::copy_from_slice(node.id().as_bytes()))?;
        Ok(node)
    }

    /// Moves a pointer found on the second lookup candidate onto the first
    /// one, and resolves it.
    ///
    /// The pointer is written to the first candidate before it is deleted from
    /// the second, so it is never missing from both. Candidates past the
    /// second one are left alone.
    pub fn clean_up_ring(&self, key: &[u8], pointer: Bytes) -> RouterResult<Option<&R::Node>> {
        let mut candidates = self.lookup_ring().iterate_nodes(key);
        let primary = candidates.next();
        let secondary = candidates.next();

        debug!(
            primary = ?primary.map(Node::id),
            secondary = ?secondary.map(Node::id),
            "Repairing pointer"
        );
        if let Some(primary) = primary {
            store(primary, key, pointer.clone())?;
        }
        if let Some(secondary) = secondary {
            remove(secondary, key)?;
        }

        Ok(self.resolve(key, &pointer))
    }

    /// Stores a value on the node chosen by the placement protocol.
    pub fn set(&self, key: &[u8], value: Bytes) -> RouterResult<()> {
        let node = self.locate_node_or_init(key)?;
        store(node, key, value)
    }

    /// Reads a value.
    ///
    /// Tries the direct storage placement first, and only consults the lookup
    /// ring when the key is not there.
    pub fn get(&self, key: &[u8]) -> RouterResult<Option<Bytes>> {
        if let Some(node) = self.storage_ring().get_node(key) {
            if let Some(value) = fetch(node, key)? {
                return Ok(Some(value));
            }
        }

        match self.locate_node(key)? {
            Some(node) => fetch(node, key),
            None => Ok(None),
        }
    }

    /// Deletes a value along with any pointer to it.
    ///
    /// Deleting a missing key is a no-op.
    pub fn delete(&self, key: &[u8]) -> RouterResult<()> {
        for node in self.lookup_ring().iterate_nodes(key).take(2) {
            remove(node, key)?;
        }

        let target = match self.locate_node(key)? {
            Some(node) => Some(node),
            None => self.storage_ring().get_node(key),
        };
        if let Some(node) = target {
            remove(node, key)?;
        }
        Ok(())
    }

    fn resolve(&self, key: &[u8], pointer: &[u8]) -> Option<&R::Node> {
        let node = std::str::from_utf8(pointer)
            .ok()
            .and_then(|id| self.storage_node(id));
        if node.is_none() {
            warn!(
                key = %String::from_utf8_lossy(key),
                pointer = %String::from_utf8_lossy(pointer),
                "Pointer does not name a storage node"
            );
        }
        node
    }
}

/// Entry point for routed key-value operations.
///
/// Holds the registry of systems. Operations without an explicit system name
/// run against [`DEFAULT_SYSTEM`].
pub struct Router<R: Ring> {
    registry: Registry<R>,
}

impl<R: Ring> Default for Router<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Ring> Router<R> {
    /// Creates a router without any systems.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    /// Registers a pre-built system, replacing any system with the same name.
    pub fn register(&self, name: impl Into<String>, system: System<R>) {
        let name = name.into();
        if self.registry.insert(name.clone(), system).is_some() {
            info!(system = %name, "Replaced system");
        } else {
            info!(system = %name, "Registered system");
        }
    }

    /// Returns the system registered under the given name.
    pub fn system(&self, name: &str) -> RouterResult<Arc<System<R>>> {
        self.registry.get(name)
    }

    /// Names of all registered systems.
    pub fn system_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Reads a value from the default system.
    pub fn get(&self, key: &[u8]) -> RouterResult<Option<Bytes>> {
        self.get_in(DEFAULT_SYSTEM, key)
    }

    /// Stores a value in the default system.
    pub fn set(&self, key: &[u8], value: impl Into<Bytes>) -> RouterResult<()> {
        self.set_in(DEFAULT_SYSTEM, key, value)
    }

    /// Deletes a value, and any pointer to it, from the default system.
    pub fn delete(&self, key: &[u8]) -> RouterResult<()> {
        self.delete_in(DEFAULT_SYSTEM, key)
    }

    /// Identifier of the storage node the key's pointer refers to, if any.
    pub fn locate_node(&self, key: &[u8]) -> RouterResult<Option<String>> {
        self.locate_node_in(DEFAULT_SYSTEM, key)
    }

    /// Reads a value from the named system.
    ///
    /// Fails with [`RouterError::UnknownSystem`] if no such system is
    /// registered; the same holds for the other `*_in` methods.
    pub fn get_in(&self, system: &str, key: &[u8]) -> RouterResult<Option<Bytes>> {
        self.system(system)?.get(key)
    }

    /// Stores a value in the named system.
    pub fn set_in(&self, system: &str, key: &[u8], value: impl Into<Bytes>) -> RouterResult<()> {
        self.system(system)?.set(key, value.into())
    }

    /// Deletes a value, and any pointer to it, from the named system.
    pub fn delete_in(&self, system: &str, key: &[u8]) -> RouterResult<()> {
        self.system(system)?.delete(key)
    }

    /// Like [`locate_node()`](Self::locate_node), in the named system.
    pub fn locate_node_in(&self, system: &str, key: &[u8]) -> RouterResult<Option<String>> {
        let system = self.system(system)?;
        let node = system.locate_node(key)?;
        Ok(node.map(|node| node.id().to_string()))
    }
}

impl<N: Node> Router<HrwRing<N>> {
    /// Creates a router with a single system built from lookup and storage
    /// pools.
    ///
    /// The system is registered under `system`, or [`DEFAULT_SYSTEM`] when
    /// none is given.
    pub fn init<C>(
        builder: &RingBuilder<C>,
        lookup: &Pools,
        storage: &Pools,
        system: Option<&str>,
    ) -> RouterResult<Self>
    where
        C: Connector<Node = N>,
    {
        let router = Self::new();
        router.add_system(builder, system.unwrap_or(DEFAULT_SYSTEM), lookup, storage)?;
        Ok(router)
    }

    /// Creates a router with every system of the configuration.
    pub fn from_config<C>(builder: &RingBuilder<C>, config: &ClusterConfig) -> RouterResult<Self>
    where
        C: Connector<Node = N>,
    {
        let router = Self::new();
        for (name, pools) in &config.systems {
            let (lookup, storage) = classify(pools);
            router.add_system(builder, name.as_str(), &lookup, &storage)?;
        }
        Ok(router)
    }

    /// Builds a system from lookup and storage pools and registers it,
    /// replacing any system with the same name.
    pub fn add_system<C>(
        &self,
        builder: &RingBuilder<C>,
        name: impl Into<String>,
        lookup: &Pools,
        storage: &Pools,
    ) -> RouterResult<()>
    where
        C: Connector<Node = N>,
    {
        let name = name.into();
        let system = builder.build_system(lookup, storage)?;
        if system.lookup_ring().is_empty() || system.storage_ring().is_empty() {
            warn!(
                system = %name,
                lookup_nodes = system.lookup_ring().len(),
                storage_nodes = system.storage_ring().len(),
                "System has an empty ring"
            );
        }
        self.register(name, system);
        Ok(())
    }
}
