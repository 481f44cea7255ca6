use {
    crate::{
        Node,
        hash::{StableNodeHasher, position},
        node::{NodeIdx, Nodes},
    },
    hrw_hash::HrwNodes,
};

/// Consistent hash ring.
///
/// Maps a key to an ordered sequence of candidate nodes. The order must be
/// deterministic: the same ring asked about the same key always yields the
/// same sequence, primary node first, followed by successive replicas.
///
/// Rings are immutable once built; membership changes mean building a new
/// ring.
pub trait Ring: Send + Sync {
    type Node: Node;

    /// Returns the primary node for the given key.
    ///
    /// It is expected to be the first node of
    /// [`iterate_nodes()`](Self::iterate_nodes). If the ring is empty, `None`
    /// is returned.
    fn get_node(&self, key: &[u8]) -> Option<&Self::Node> {
        self.iterate_nodes(key).next()
    }

    /// Returns all nodes of the ring, ordered by preference for the given key.
    fn iterate_nodes(&self, key: &[u8]) -> impl Iterator<Item = &Self::Node>;
}

/// Ring using Highest Random Weight (rendezvous) hashing.
///
/// For every key, nodes are ranked by a per-(key, node) score; the ranking is
/// the candidate order. Adding or removing a node only moves keys whose top
/// candidates involve that node.
///
/// Keys and node indexes are hashed with
/// [`StableHasher`](crate::StableHasher), so the order only depends on the
/// node identifiers and the key bytes.
pub struct HrwRing<N> {
    nodes: Nodes<N>,
    hrw: HrwNodes<NodeIdx, StableNodeHasher>,
}

impl<N: Node> HrwRing<N> {
    /// Builds a ring over the given nodes.
    pub fn new(nodes: Nodes<N>) -> Self {
        let hrw = HrwNodes::with_hasher(StableNodeHasher, nodes.indexes());
        Self { nodes, hrw }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<N: Node> Ring for HrwRing<N> {
    type Node = N;

    fn iterate_nodes(&self, key: &[u8]) -> impl Iterator<Item = &N> {
        let order: Vec<NodeIdx> = self.hrw.sorted(&position(key)).copied().collect();
        order
            .into_iter()
            .filter_map(move |node_idx| self.nodes.get(node_idx))
    }
}
