//! A hashed key-value map without a local cache.

use crate::error::{Result, StorageError};
use crate::layout::{HashLayout, HashingStrategy, Layout, StorageLayout};
use crate::packed::{
    clear_packed_root, pull_packed_root_opt, push_packed_root, try_pull_packed_root,
};
use crate::traits::{PackedLayout, SpreadLayout};
use serde::Serialize;
use std::marker::PhantomData;
use tessera_core::{Blake3x256, CryptoHasher, Key, KeyPtr};
use tessera_env::{codec, Env, Host};

/// A map whose values live at `Hs(prefix ++ encode(key))`.
///
/// Every operation goes straight to the host; there is nothing to flush.
/// The prefix is the key reserved for the mapping in its parent's layout.
pub struct Mapping<K, V, Hs = Blake3x256> {
    prefix: Option<Key>,
    _marker: PhantomData<fn() -> (K, V, Hs)>,
}

impl<K, V, Hs> Default for Mapping<K, V, Hs> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, Hs> std::fmt::Debug for Mapping<K, V, Hs> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mapping").field("prefix", &self.prefix).finish()
    }
}

impl<K, V, Hs> Mapping<K, V, Hs> {
    /// A mapping with no prefix yet. Usable once pulled or pushed.
    pub fn new() -> Self {
        Self {
            prefix: None,
            _marker: PhantomData,
        }
    }

    /// A mapping at `prefix`.
    pub fn from_key(prefix: Key) -> Self {
        Self {
            prefix: Some(prefix),
            _marker: PhantomData,
        }
    }

    pub fn prefix(&self) -> Option<&Key> {
        self.prefix.as_ref()
    }
}

impl<K, V, Hs> Mapping<K, V, Hs>
where
    K: Serialize,
    V: PackedLayout,
    Hs: CryptoHasher,
{
    /// The storage key of `key`.
    pub fn storage_key(&self, key: &K) -> Result<Key> {
        let prefix = self.prefix.ok_or(StorageError::Unbound)?;
        let prefix = prefix.to_bytes();
        let encoded = codec::encode(key)?;
        Ok(Key::from_bytes(Hs::hash_concat(&[prefix.as_slice(), encoded.as_slice()])))
    }

    /// The value at `key`. A missing key is a not-found error.
    pub fn get<H: Host>(&self, key: &K, env: &mut Env<H>) -> Result<V> {
        try_pull_packed_root(&self.storage_key(key)?, env)
    }

    /// The value at `key`, or `None`.
    pub fn get_or_none<H: Host>(&self, key: &K, env: &mut Env<H>) -> Result<Option<V>> {
        pull_packed_root_opt(&self.storage_key(key)?, env)
    }

    /// Check if a value is stored at `key`.
    pub fn has<H: Host>(&self, key: &K, env: &mut Env<H>) -> Result<bool> {
        Ok(env.contains_contract_storage(&self.storage_key(key)?)?)
    }

    /// Store `value` at `key`.
    pub fn set<H: Host>(&self, key: &K, value: &V, env: &mut Env<H>) -> Result<()> {
        push_packed_root(value, &self.storage_key(key)?, env)
    }

    /// Clear `key` without reading it.
    pub fn delete<H: Host>(&self, key: &K, env: &mut Env<H>) -> Result<()> {
        env.clear_contract_storage(&self.storage_key(key)?)?;
        Ok(())
    }

    /// Clear `key` and return what was stored there.
    pub fn remove<H: Host>(&self, key: &K, env: &mut Env<H>) -> Result<Option<V>> {
        let storage_key = self.storage_key(key)?;
        let value = pull_packed_root_opt::<V, _>(&storage_key, env)?;
        if let Some(value) = &value {
            clear_packed_root(value, &storage_key, env)?;
        }
        Ok(value)
    }
}

impl<K, V, Hs> SpreadLayout for Mapping<K, V, Hs> {
    const FOOTPRINT: u64 = 1;

    fn pull_spread<H: Host>(ptr: &mut KeyPtr, _env: &mut Env<H>) -> Result<Self> {
        Ok(Self::from_key(ptr.advance()))
    }

    fn push_spread<H: Host>(&mut self, ptr: &mut KeyPtr, _env: &mut Env<H>) -> Result<()> {
        self.prefix = Some(ptr.advance());
        Ok(())
    }

    /// Entries cannot be enumerated; only the prefix slot is released.
    fn clear_spread<H: Host>(&mut self, ptr: &mut KeyPtr, _env: &mut Env<H>) -> Result<()> {
        self.prefix = Some(ptr.advance());
        Ok(())
    }
}

impl<K, V, Hs: CryptoHasher> StorageLayout for Mapping<K, V, Hs> {
    fn layout(ptr: &mut KeyPtr) -> Layout {
        let offset = ptr.advance();
        Layout::Hash(HashLayout {
            offset,
            strategy: HashingStrategy {
                hasher: Hs::NAME.to_string(),
                prefix: format!("0x{}", offset.to_hex()),
                postfix: String::new(),
            },
            layout: Box::new(Layout::cell::<V>(offset)),
        })
    }
}
