use {
    crate::{
        BoxError,
        HrwRing,
        Node,
        Nodes,
        Pools,
        RouterError,
        RouterResult,
        System,
    },
    auto_impl::auto_impl,
    tracing::debug,
};

/// Opens backend nodes for configured endpoints.
#[auto_impl(&, Box, Arc)]
pub trait Connector {
    type Node: Node;

    /// Creates the adapter for one endpoint of the given pool.
    fn connect(&self, pool: &str, endpoint: &str) -> Result<Self::Node, BoxError>;
}

/// Builds rings and systems out of pool configuration.
///
/// Construction failures are fatal and never retried: a single endpoint that
/// cannot be connected fails the whole build.
pub struct RingBuilder<C>(C);

impl<C: Connector> RingBuilder<C> {
    /// Create new ring builder.
    pub fn new(connector: C) -> Self {
        Self(connector)
    }

    /// Connector used to open nodes.
    pub fn connector(&self) -> &C {
        &self.0
    }

    /// Instantiates one node per endpoint of a pool.
    pub fn connect_pool(
        &self,
        group: &str,
        endpoints: &[String],
    ) -> RouterResult<Nodes<C::Node>> {
        let mut nodes = Nodes::new();
        for endpoint in endpoints {
            let node = self
                .0
                .connect(group, endpoint)
                .map_err(|source| RouterError::NodeConstruction {
                    pool: group.to_string(),
                    endpoint: endpoint.clone(),
                    source,
                })?;
            debug!(
                pool = group,
                endpoint = endpoint.as_str(),
                node = node.id(),
                "Connected node"
            );
            nodes.insert(node)?;
        }
        Ok(nodes)
    }

    /// Builds a ring over the endpoints of a pool.
    ///
    /// Besides the ring, returns the identifier to node mapping needed to
    /// resolve pointers back into live nodes.
    pub fn build_ring(
        &self,
        group: &str,
        endpoints: &[String],
    ) -> RouterResult<(HrwRing<C::Node>, Nodes<C::Node>)> {
        let nodes = self.connect_pool(group, endpoints)?;
        Ok((HrwRing::new(nodes.clone()), nodes))
    }

    /// Builds one ring over every endpoint of every pool in `pools`.
    pub fn build_merged_ring(
        &self,
        pools: &Pools,
    ) -> RouterResult<(HrwRing<C::Node>, Nodes<C::Node>)> {
        let mut nodes = Nodes::new();
        for (group, endpoints) in pools {
            nodes.merge(self.connect_pool(group, endpoints)?)?;
        }
        Ok((HrwRing::new(nodes.clone()), nodes))
    }

    /// Builds a system out of already classified lookup and storage pools.
    pub fn build_system(
        &self,
        lookup: &Pools,
        storage: &Pools,
    ) -> RouterResult<System<HrwRing<C::Node>>> {
        let (lookup_ring, _) = self.build_merged_ring(lookup)?;
        let (storage_ring, storage_nodes) = self.build_merged_ring(storage)?;
        Ok(System::new(lookup_ring, storage_ring, storage_nodes))
    }
}
