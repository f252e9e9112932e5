//! # Typed Identifiers
//!
//! Zero-cost wrappers around raw `u64` identifiers so asset ids, account ids
//! and pool ids cannot be swapped by accident, plus [`PoolKey`], the 32-byte
//! digest a registry uses to look pools up by their `(assets, weights)`
//! definition.
//!
//! ```rust
//! use wamm_types::{AccountId, AssetId};
//!
//! fn deposit(asset: AssetId, depositor: AccountId) { /* ... */ }
//!
//! deposit(AssetId::new(31566704), AccountId::new(7));
//! // deposit(AccountId::new(7), AssetId::new(31566704)); // compile error
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate a typed `u64` identifier
macro_rules! define_typed_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[repr(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Create a new typed ID
            #[inline(always)]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Extract the inner u64 value
            #[inline(always)]
            pub const fn inner(&self) -> u64 {
                self.0
            }

            /// Check if this is a null/zero ID
            #[inline(always)]
            pub fn is_null(&self) -> bool {
                self.0 == 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<u64> for $name {
            #[inline(always)]
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            #[inline(always)]
            fn from(id: $name) -> u64 {
                id.0
            }
        }

        // Serializes as raw u64
        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                self.0.serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                u64::deserialize(deserializer).map(Self)
            }
        }
    };
}

define_typed_id!(
    /// Identifier of a fungible asset, including a pool's share token
    AssetId
);

define_typed_id!(
    /// Identity of a depositor, swapper or share holder
    AccountId
);

define_typed_id!(
    /// Identifier of a deployed pool instance
    PoolId
);

/// Digest identifying a pool by its sorted `(asset, weight)` definition
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PoolKey(pub [u8; 32]);

impl PoolKey {
    /// Lowercase hex encoding of the full digest
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Deterministic asset id derived from the first eight digest bytes
    ///
    /// Used as the identity of the pool's share token. The high bit is set so
    /// derived ids never collide with small, sequentially issued asset ids.
    pub fn derived_asset_id(&self) -> AssetId {
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&self.0[..8]);
        AssetId(u64::from_be_bytes(prefix) | (1 << 63))
    }
}

impl fmt::Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl fmt::Debug for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PoolKey(0x{})", self.to_hex())
    }
}
