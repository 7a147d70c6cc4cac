//! Profile Registry: named profile recipes
//!
//! Populated once at startup (built-ins, then a settings file), read-only
//! while profiles are built. The registry is an explicit handle; share it
//! across threads through [`SharedProfileRegistry`].

use crate::config::{ProfileConfig, ProfileSettings};
use crate::criterion::Criterion;
use crate::error::{ProfileError, ProfileResult};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Registry of profile configs keyed by name
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    entries: BTreeMap<String, ProfileConfig>,
}

impl ProfileRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with one default profile per built-in criterion
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for name in Criterion::builtin_names() {
            if let Some(criterion) = Criterion::builtin(name) {
                registry.register(name, ProfileConfig::new(criterion));
            }
        }
        registry
    }

    /// Store a config under `name`, replacing any previous entry
    pub fn register(&mut self, name: impl Into<String>, config: ProfileConfig) {
        let name = name.into();
        if self.entries.insert(name.clone(), config).is_some() {
            debug!(profile = %name, "Replaced registered profile");
        }
    }

    /// Register every profile declared in `settings`
    pub fn apply_settings(&mut self, settings: ProfileSettings) -> ProfileResult<usize> {
        let configs = settings.into_configs()?;
        let count = configs.len();
        for (name, config) in configs {
            self.register(name, config);
        }
        Ok(count)
    }

    /// Look up a config, failing with the list of known names
    pub fn get(&self, name: &str) -> ProfileResult<&ProfileConfig> {
        self.entries
            .get(name)
            .ok_or_else(|| ProfileError::not_found(name, self.list()))
    }

    /// Registered names, sorted
    pub fn list(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Thread-safe shared registry
pub type SharedProfileRegistry = Arc<RwLock<ProfileRegistry>>;

/// Wrap a populated registry for concurrent readers
pub fn create_shared_registry(registry: ProfileRegistry) -> SharedProfileRegistry {
    Arc::new(RwLock::new(registry))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_builtins() {
        let registry = ProfileRegistry::with_defaults();
        assert_eq!(
            registry.list(),
            vec!["cpu_time", "evaluations", "iterations", "wall_time"]
        );
        assert_eq!(registry.get("iterations").unwrap().criterion.name(), "iterations");
    }

    #[test]
    fn test_register_overwrites() {
        let mut registry = ProfileRegistry::new();
        let criterion = Criterion::builtin("wall_time").unwrap();
        registry.register("t", ProfileConfig::new(criterion.clone()));
        registry.register(
            "t",
            ProfileConfig::new(criterion).with_instance_keys(["problem"]),
        );

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("t").unwrap().instance_key_columns,
            vec!["problem"]
        );
    }

    #[test]
    fn test_unknown_name_lists_known() {
        let registry = ProfileRegistry::with_defaults();
        match registry.get("memory") {
            Err(ProfileError::NotFound { name, known }) => {
                assert_eq!(name, "memory");
                assert_eq!(known.len(), 4);
                assert!(known.contains(&"wall_time".to_string()));
            }
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[test]
    fn test_apply_settings() {
        let mut registry = ProfileRegistry::with_defaults();
        let settings = ProfileSettings::from_toml_str(
            "[profiles.wall_time]\ncriterion = \"wall_time\"\ninstance_keys = [\"problem\"]\n\n\
             [profiles.score]\nmetric = \"score\"\ndirection = \"higher\"\n",
        )
        .unwrap();

        assert_eq!(registry.apply_settings(settings).unwrap(), 2);
        assert_eq!(registry.len(), 5);
        assert!(registry.contains("score"));
        assert_eq!(
            registry.get("wall_time").unwrap().instance_key_columns,
            vec!["problem"]
        );
    }

    #[test]
    fn test_shared_registry_reads() {
        let shared = create_shared_registry(ProfileRegistry::with_defaults());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || shared.read().unwrap().contains("cpu_time"))
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
