use std::fmt;

/// Error reported by a backend node adapter or connector.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Role a ring plays within a system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingRole {
    /// Ring holding relocation pointers.
    Lookup,

    /// Ring holding actual values.
    Storage,
}

impl fmt::Display for RingRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RingRole::Lookup => f.write_str("lookup"),
            RingRole::Storage => f.write_str("storage"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// System with the given name is not registered.
    #[error("Unknown system: {0}")]
    UnknownSystem(String),

    /// Backend node adapter could not be constructed.
    #[error("Failed to construct node for {endpoint} in pool {pool}: {source}")]
    NodeConstruction {
        pool: String,
        endpoint: String,
        #[source]
        source: BoxError,
    },

    /// Two nodes of the same ring share an identifier.
    #[error("Duplicate node identifier: {0}")]
    DuplicateNode(String),

    /// Placement requested on a ring without nodes.
    #[error("No nodes in the {0} ring")]
    EmptyRing(RingRole),

    /// Backend node failed to serve a request.
    #[error("Backend node {node} failed: {source}")]
    Backend {
        node: String,
        #[source]
        source: BoxError,
    },

    /// Configuration could not be read or parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl RouterError {
    pub(crate) fn backend(node: &str, source: BoxError) -> Self {
        RouterError::Backend {
            node: node.to_string(),
            source,
        }
    }
}

pub type RouterResult<T> = Result<T, RouterError>;
