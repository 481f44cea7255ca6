use {
    crate::{RouterError, RouterResult},
    serde::{Deserialize, Serialize},
    std::{collections::BTreeMap, path::Path},
};

/// Pool name to endpoint list mapping.
pub type Pools = BTreeMap<String, Vec<String>>;

/// Splits pools into lookup and storage groups.
///
/// A pool belongs to the lookup group if its name contains `"lookup"`,
/// otherwise to the storage group if its name contains `"storage"`. Pools
/// matching neither are dropped.
pub fn classify(pools: &Pools) -> (Pools, Pools) {
    let mut lookup = Pools::new();
    let mut storage = Pools::new();
    for (name, endpoints) in pools {
        if name.contains("lookup") {
            lookup.insert(name.clone(), endpoints.clone());
        } else if name.contains("storage") {
            storage.insert(name.clone(), endpoints.clone());
        }
    }
    (lookup, storage)
}

/// Cluster configuration.
///
/// ```toml
/// [systems.default]
/// lookup1_A = ["127.0.0.1:1234", "127.0.0.1:4567"]
/// storage1_A = ["127.0.0.2:1234", "127.0.0.2:4567"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Pools of every system, keyed by system name.
    #[serde(default)]
    pub systems: BTreeMap<String, Pools>,
}

impl ClusterConfig {
    /// Parses configuration from a TOML string.
    pub fn from_toml(toml: &str) -> RouterResult<Self> {
        toml::from_str(toml).map_err(|e| RouterError::Config(e.to_string()))
    }

    /// Reads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> RouterResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            RouterError::Config(format!("{}: {e}", path.as_ref().display()))
        })?;
        Self::from_toml(&contents)
    }

    /// Classified pools of the given system.
    pub fn system(&self, name: &str) -> Option<(Pools, Pools)> {
        self.systems.get(name).map(classify)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_pools() -> Pools {
        let mut pools = Pools::new();
        pools.insert(
            "lookup1_A".to_string(),
            vec!["127.0.0.1:1234".to_string(), "127.0.0.1:4567".to_string()],
        );
        pools.insert(
            "storage1_A".to_string(),
            vec!["127.0.0.2:1234".to_string(), "127.0.0.2:4567".to_string()],
        );
        pools
    }

    #[test]
    fn splits_lookup_and_storage() {
        let (lookup, storage) = classify(&valid_pools());
        assert!(lookup.contains_key("lookup1_A"));
        assert!(!lookup.contains_key("storage1_A"));
        assert!(storage.contains_key("storage1_A"));
        assert!(!storage.contains_key("lookup1_A"));
        assert_eq!(lookup["lookup1_A"].len(), 2);
    }

    #[test]
    fn ignores_unknown_pools() {
        let mut pools = valid_pools();
        pools.insert("foobarbaz".to_string(), vec![]);

        let (lookup, storage) = classify(&pools);
        assert!(!lookup.contains_key("foobarbaz"));
        assert!(!storage.contains_key("foobarbaz"));
    }

    #[test]
    fn lookup_wins_over_storage() {
        let mut pools = Pools::new();
        pools.insert("lookup_storage".to_string(), vec!["a:1".to_string()]);

        let (lookup, storage) = classify(&pools);
        assert!(lookup.contains_key("lookup_storage"));
        assert!(storage.is_empty());
    }

    #[test]
    fn parses_toml() {
        let config = ClusterConfig::from_toml(
            r#"
            [systems.default]
            lookup1_A = ["127.0.0.1:1234", "127.0.0.1:4567"]
            storage1_A = ["127.0.0.2:1234", "127.0.0.2:4567"]

            [systems.archive]
            lookup2_A = ["127.0.0.3:1234"]
            storage2_A = ["127.0.0.4:1234"]
            "#,
        )
        .unwrap();

        assert_eq!(config.systems.len(), 2);
        assert_eq!(config.systems["default"], valid_pools());

        let (lookup, storage) = config.system("archive").unwrap();
        assert!(lookup.contains_key("lookup2_A"));
        assert!(storage.contains_key("storage2_A"));
        assert!(config.system("missing").is_none());
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = ClusterConfig::from_toml("[systems.default]\nlookup1_A = 42").unwrap_err();
        assert!(matches!(err, RouterError::Config(_)));

        let err = ClusterConfig::from_file("/nonexistent/lookup-ring.toml").unwrap_err();
        assert!(matches!(err, RouterError::Config(_)));
    }
}
