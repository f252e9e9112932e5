//! Pool registry keyed by pool definition
//!
//! A pool is identified by the hash of its `(asset, weight)` pairs sorted by
//! asset id, so the same definition cannot be registered twice regardless of
//! the order assets were listed in.

use crate::clock::Clock;
use crate::engine::PoolEngine;
use sha3::{Digest, Sha3_256};
use std::collections::HashMap;
use tracing::info;
use wamm_types::{AssetId, PoolError, PoolId, PoolKey};

/// Hash of the sorted `(asset, weight)` pairs, each encoded as two big-endian u64s
pub fn pool_key(asset_ids: &[AssetId], weights: &[u64]) -> Result<PoolKey, PoolError> {
    if asset_ids.len() != weights.len() {
        return Err(PoolError::LengthMismatch {
            expected: asset_ids.len(),
            actual: weights.len(),
        });
    }

    let mut pairs: Vec<(AssetId, u64)> = asset_ids
        .iter()
        .copied()
        .zip(weights.iter().copied())
        .collect();
    pairs.sort_unstable_by_key(|(asset, _)| *asset);

    let mut hasher = Sha3_256::new();
    for (asset, weight) in pairs {
        hasher.update(asset.inner().to_be_bytes());
        hasher.update(weight.to_be_bytes());
    }

    Ok(PoolKey(hasher.finalize().into()))
}

/// Lookup of deployed pools by definition
pub trait PoolRegistry {
    /// Record a new pool, failing if the key is taken
    fn register(&mut self, key: PoolKey) -> Result<PoolId, PoolError>;

    fn lookup(&self, key: &PoolKey) -> Option<PoolId>;

    /// Bootstrap `engine` with the definition and register it
    ///
    /// The registry is checked first so a duplicate leaves the engine untouched.
    fn init_pool<C: Clock>(
        &mut self,
        engine: &mut PoolEngine<C>,
        asset_ids: Vec<AssetId>,
        weights: Vec<u64>,
    ) -> Result<PoolId, PoolError> {
        let key = pool_key(&asset_ids, &weights)?;
        if self.lookup(&key).is_some() {
            return Err(PoolError::PoolAlreadyExists {
                key: key.to_string(),
            });
        }

        engine.bootstrap(asset_ids, weights)?;
        self.register(key)
    }
}

/// Process-local registry
#[derive(Debug, Default)]
pub struct InMemoryPoolRegistry {
    pools: HashMap<PoolKey, PoolId>,
    next_id: u64,
}

impl InMemoryPoolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

impl PoolRegistry for InMemoryPoolRegistry {
    fn register(&mut self, key: PoolKey) -> Result<PoolId, PoolError> {
        if self.pools.contains_key(&key) {
            return Err(PoolError::PoolAlreadyExists {
                key: key.to_string(),
            });
        }

        self.next_id += 1;
        let id = PoolId::new(self.next_id);
        self.pools.insert(key, id);
        info!("Pool registered: {} key={}", id, key);
        Ok(id)
    }

    fn lookup(&self, key: &PoolKey) -> Option<PoolId> {
        self.pools.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assets(ids: &[u64]) -> Vec<AssetId> {
        ids.iter().copied().map(AssetId::new).collect()
    }

    #[test]
    fn test_pool_key_ignores_listing_order() {
        let forward = pool_key(&assets(&[1, 2]), &[800_000, 200_000]).unwrap();
        let reversed = pool_key(&assets(&[2, 1]), &[200_000, 800_000]).unwrap();
        assert_eq!(forward, reversed);

        let different = pool_key(&assets(&[1, 2]), &[200_000, 800_000]).unwrap();
        assert_ne!(forward, different);
    }

    #[test]
    fn test_pool_key_length_mismatch() {
        assert!(matches!(
            pool_key(&assets(&[1, 2]), &[1_000_000]),
            Err(PoolError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = InMemoryPoolRegistry::new();
        let key = pool_key(&assets(&[1, 2]), &[500_000, 500_000]).unwrap();

        let id = registry.register(key).unwrap();
        assert_eq!(registry.lookup(&key), Some(id));
        assert_eq!(registry.len(), 1);
        assert!(matches!(
            registry.register(key),
            Err(PoolError::PoolAlreadyExists { .. })
        ));
    }
}
