use {
    hrw_hash::NodeHasher,
    rapidhash::rapidhash,
    std::hash::{BuildHasher, BuildHasherDefault, Hash, Hasher},
};

/// Portable hasher used to index nodes and position keys.
///
/// Buffers the written bytes and hashes them with rapidhash on `finish()`.
/// Unlike the standard library's `RandomState`, the output does not depend on
/// a per-process seed. Integers are written little-endian and `usize` as a
/// `u64`, so the output doesn't depend on byte order or pointer width either:
/// node indexes (and therefore candidate order on the ring) agree between
/// every process sharing a configuration.
#[derive(Default)]
pub struct StableHasher(Vec<u8>);

impl Hasher for StableHasher {
    fn write(&mut self, bytes: &[u8]) {
        self.0.extend_from_slice(bytes);
    }

    fn write_u16(&mut self, i: u16) {
        self.write(&i.to_le_bytes());
    }

    fn write_u32(&mut self, i: u32) {
        self.write(&i.to_le_bytes());
    }

    fn write_u64(&mut self, i: u64) {
        self.write(&i.to_le_bytes());
    }

    fn write_u128(&mut self, i: u128) {
        self.write(&i.to_le_bytes());
    }

    fn write_usize(&mut self, i: usize) {
        self.write_u64(i as u64);
    }

    fn finish(&self) -> u64 {
        rapidhash(&self.0)
    }
}

/// Build hasher producing [`StableHasher`] instances.
pub type StableBuildHasher = BuildHasherDefault<StableHasher>;

/// Hashes raw key bytes into a ring position.
///
/// No length prefix is written, so this equals `rapidhash(key)`.
pub(crate) fn position(key: &[u8]) -> u64 {
    let mut hasher = StableHasher::default();
    hasher.write(key);
    hasher.finish()
}

/// [`NodeHasher`] feeding the HRW scores through [`StableHasher`].
pub(crate) struct StableNodeHasher;

impl NodeHasher for StableNodeHasher {
    fn hash<K: Hash>(&self, key: &K) -> u64 {
        StableBuildHasher::default().hash_one(key)
    }
}
