use {
    crate::{BoxError, Connector, Node},
    bytes::Bytes,
    parking_lot::{Mutex, RwLock},
    std::{collections::HashMap, sync::Arc},
};

/// In-memory backend node.
///
/// Clones share the same underlying map, so a clone handed to a ring and a
/// clone kept by the caller observe the same data.
#[derive(Debug, Clone)]
pub struct MemoryNode {
    id: String,
    data: Arc<RwLock<HashMap<Vec<u8>, Bytes>>>,
}

impl MemoryNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: Arc::default(),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.data.read().contains_key(key)
    }
}

impl Node for MemoryNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn get(&self, key: &[u8]) -> Result<Option<Bytes>, BoxError> {
        Ok(self.data.read().get(key).cloned())
    }

    fn set(&self, key: &[u8], value: Bytes) -> Result<(), BoxError> {
        self.data.write().insert(key.to_vec(), value);
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), BoxError> {
        self.data.write().remove(key);
        Ok(())
    }
}

/// Connector producing [`MemoryNode`]s.
///
/// Each endpoint maps to exactly one node: connecting to the same endpoint
/// twice returns clones of the same node, which lets tests inspect what the
/// router wrote and lets several systems share an endpoint.
#[derive(Debug, Default)]
pub struct MemoryConnector {
    nodes: Mutex<HashMap<String, MemoryNode>>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node previously created for `endpoint`.
    pub fn node(&self, endpoint: &str) -> Option<MemoryNode> {
        self.nodes.lock().get(endpoint).cloned()
    }
}

impl Connector for MemoryConnector {
    type Node = MemoryNode;

    fn connect(&self, _pool: &str, endpoint: &str) -> Result<MemoryNode, BoxError> {
        if endpoint.is_empty() {
            return Err("empty endpoint".into());
        }
        Ok(self
            .nodes
            .lock()
            .entry(endpoint.to_string())
            .or_insert_with(|| MemoryNode::new(endpoint))
            .clone())
    }
}
