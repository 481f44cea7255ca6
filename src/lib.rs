//! Key routing across two consistent hash rings.
//!
//! Keys are placed on a *storage ring* by consistent hashing, but a key's
//! value may also live elsewhere: a *lookup ring* holds pointers from keys to
//! the storage node currently holding them. This allows relocating keys
//! between nodes (or re-partitioning a cluster) without rehashing everything
//! up front.
//!
//! Pointers are resolved lazily. Only the first two lookup candidates of a key
//! are consulted, and a pointer found on the second one is moved onto the
//! first one on the spot (read-repair), so the next lookup takes the fast
//! path.
//!
//! ```
//! use lookup_ring::{MemoryConnector, Pools, RingBuilder, Router, classify};
//!
//! let mut pools = Pools::new();
//! pools.insert("lookup1_A".into(), vec!["127.0.0.1:1234".into(), "127.0.0.1:4567".into()]);
//! pools.insert("storage1_A".into(), vec!["127.0.0.2:1234".into(), "127.0.0.2:4567".into()]);
//! let (lookup, storage) = classify(&pools);
//!
//! let builder = RingBuilder::new(MemoryConnector::new());
//! let router = Router::init(&builder, &lookup, &storage, None).unwrap();
//!
//! router.set(b"hello", "world").unwrap();
//! assert_eq!(router.get(b"hello").unwrap().as_deref(), Some(&b"world"[..]));
//!
//! router.delete(b"hello").unwrap();
//! assert_eq!(router.get(b"hello").unwrap(), None);
//! ```

mod builder;
mod config;
mod error;
mod hash;
mod memory;
mod node;
mod ring;
mod router;
mod system;

pub use {
    builder::{Connector, RingBuilder},
    config::{ClusterConfig, Pools, classify},
    error::{BoxError, RingRole, RouterError, RouterResult},
    hash::{StableBuildHasher, StableHasher},
    memory::{MemoryConnector, MemoryNode},
    node::{Node, Nodes},
    ring::{HrwRing, Ring},
    router::Router,
    system::{DEFAULT_SYSTEM, Registry, System},
};
