use {
    crate::{BoxError, RouterError, RouterResult, hash::StableBuildHasher},
    auto_impl::auto_impl,
    bytes::Bytes,
    std::{collections::HashMap, hash::BuildHasher, sync::Arc},
};

/// Backend key-value node.
///
/// Wraps one physical key-value endpoint. The router never talks to an
/// endpoint directly: nodes are always reached through a ring's placement
/// function, and all three operations are treated as idempotent.
///
/// Timeouts and retries are the adapter's business. Any error returned here
/// aborts the router operation in progress and is surfaced to its caller.
#[auto_impl(&, Box, Arc)]
pub trait Node: Send + Sync {
    /// Stable identifier of the node.
    ///
    /// This is the value stored in the lookup ring as a relocation pointer,
    /// so it must be unique within a ring and stable across restarts.
    fn id(&self) -> &str;

    /// Returns the value stored under `key`, or `None` if absent.
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>, BoxError>;

    /// Stores `value` under `key`, overwriting any previous value.
    fn set(&self, key: &[u8], value: Bytes) -> Result<(), BoxError>;

    /// Removes `key`. Removing an absent key is not an error.
    fn delete(&self, key: &[u8]) -> Result<(), BoxError>;
}

/// Node hash.
pub(crate) type NodeIdx = u64;

/// Nodes collection.
///
/// Maps node identifiers to live adapters. The collection assigns each node an
/// index (by hashing its identifier), which serves as a handle throughout the
/// ring -- wherever we need to store the node, we store the index instead.
///
/// Adapters are reference counted, so the same collection can back a ring and
/// still be handed out to resolve pointers back into nodes.
pub struct Nodes<N> {
    nodes: HashMap<NodeIdx, Arc<N>>,
}

// Manual impl: cloning shares the adapters, so `N` need not be `Clone`.
impl<N> Clone for Nodes<N> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
        }
    }
}

impl<N> Default for Nodes<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Nodes<N> {
    /// Creates a new empty nodes collection.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    /// Number of nodes in the collection.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the collection holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns index of a node with the given identifier.
    pub(crate) fn idx(&self, id: &str) -> NodeIdx {
        StableBuildHasher::default().hash_one(id)
    }

    /// Iterator over the indices of the nodes in the collection.
    pub(crate) fn indexes(&self) -> impl Iterator<Item = NodeIdx> {
        self.nodes.keys().copied()
    }
}

impl<N: Node> Nodes<N> {
    /// Adds a node to the collection.
    ///
    /// Returns the index of the node, or an error if a node with the same
    /// identifier is already present.
    pub fn insert(&mut self, node: N) -> RouterResult<NodeIdx> {
        let idx = self.idx(node.id());
        if self.nodes.contains_key(&idx) {
            return Err(RouterError::DuplicateNode(node.id().to_string()));
        }
        self.nodes.insert(idx, Arc::new(node));

        Ok(idx)
    }

    /// Moves all nodes of `other` into this collection.
    pub fn merge(&mut self, other: Nodes<N>) -> RouterResult<()> {
        for node in other.nodes.into_values() {
            let idx = self.idx(node.id());
            if self.nodes.contains_key(&idx) {
                return Err(RouterError::DuplicateNode(node.id().to_string()));
            }
            self.nodes.insert(idx, node);
        }
        Ok(())
    }

    /// Returns a reference to the node with given index.
    pub(crate) fn get(&self, idx: NodeIdx) -> Option<&N> {
        self.nodes.get(&idx).map(Arc::as_ref)
    }

    /// Resolves a node identifier (e.g. a pointer read from the lookup ring)
    /// back into a live node.
    pub fn by_id(&self, id: &str) -> Option<&N> {
        self.get(self.idx(id)).filter(|node| node.id() == id)
    }

    /// Iterator over the nodes in the collection, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &N> {
        self.nodes.values().map(Arc::as_ref)
    }
}
