//! A single lazily loaded value.

use crate::entry::StorageEntry;
use crate::error::{Result, StorageError};
use crate::layout::{Layout, StorageLayout};
use crate::packed::clear_packed_root;
use crate::traits::{PackedLayout, SpreadLayout};
use tessera_core::{Key, KeyPtr};
use tessera_env::{Env, Host};

/// A value in one packed cell, read on first access and written on push
/// only if it changed.
#[derive(Debug)]
pub struct Lazy<T> {
    key: Option<Key>,
    entry: Option<StorageEntry<T>>,
}

impl<T> Default for Lazy<T> {
    fn default() -> Self {
        Self {
            key: None,
            entry: None,
        }
    }
}

impl<T> Lazy<T> {
    /// A new value, written on the next push.
    pub fn new(value: T) -> Self {
        Self {
            key: None,
            entry: Some(StorageEntry::new(value)),
        }
    }

    /// A value stored at `key`, not yet loaded.
    pub fn from_key(key: Key) -> Self {
        Self {
            key: Some(key),
            entry: None,
        }
    }

    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    /// Check if the value was loaded or set in this session.
    pub fn is_loaded(&self) -> bool {
        self.entry.is_some()
    }

    /// Replace the value without reading the old one.
    pub fn set(&mut self, value: T) {
        match self.entry.as_mut() {
            Some(entry) => entry.set(value),
            None => self.entry = Some(StorageEntry::new(value)),
        }
    }

    /// Drop the value without reading it. The cell is cleared on push.
    pub fn clear(&mut self) {
        self.entry = Some(StorageEntry::cleared());
    }
}

impl<T: PackedLayout> Lazy<T> {
    fn entry_mut<H: Host>(&mut self, env: &mut Env<H>) -> Result<&mut StorageEntry<T>> {
        if self.entry.is_none() {
            let key = self.key.ok_or(StorageError::Unbound)?;
            self.entry = Some(StorageEntry::pull_packed_root(&key, env)?);
        }
        self.entry.as_mut().ok_or(StorageError::EmptyEntry)
    }

    /// The value. Fails with [`StorageError::EmptyEntry`] if absent.
    pub fn get<H: Host>(&mut self, env: &mut Env<H>) -> Result<&T> {
        self.entry_mut(env)?.get()
    }

    /// The value, or `None` if absent.
    pub fn try_get<H: Host>(&mut self, env: &mut Env<H>) -> Result<Option<&T>> {
        Ok(self.entry_mut(env)?.value())
    }

    /// The value for mutation.
    pub fn get_mut<H: Host>(&mut self, env: &mut Env<H>) -> Result<&mut T> {
        self.entry_mut(env)?.get_mut()
    }
}

impl<T: PackedLayout> SpreadLayout for Lazy<T> {
    const FOOTPRINT: u64 = 1;

    fn pull_spread<H: Host>(ptr: &mut KeyPtr, _env: &mut Env<H>) -> Result<Self> {
        Ok(Self::from_key(ptr.advance()))
    }

    fn push_spread<H: Host>(&mut self, ptr: &mut KeyPtr, env: &mut Env<H>) -> Result<()> {
        let key = ptr.advance();
        self.key = Some(key);
        match self.entry.as_mut() {
            Some(entry) => entry.push_packed_root(&key, env),
            None => Ok(()),
        }
    }

    /// Clearing a value that was never loaded reads it first only when
    /// `T::REQUIRES_DEEP_CLEAN_UP` is set, to run its `clear_packed` hooks.
    fn clear_spread<H: Host>(&mut self, ptr: &mut KeyPtr, env: &mut Env<H>) -> Result<()> {
        let key = ptr.advance();
        self.key = Some(key);
        if self.entry.is_none() && !T::REQUIRES_DEEP_CLEAN_UP {
            env.clear_contract_storage(&key)?;
            self.entry = Some(StorageEntry::cleared());
            return Ok(());
        }
        let entry = self.entry_mut(env)?;
        match entry.value() {
            Some(value) => clear_packed_root(value, &key, env)?,
            None => env.clear_contract_storage(&key)?,
        }
        entry.clear();
        Ok(())
    }
}

impl<T> StorageLayout for Lazy<T> {
    fn layout(ptr: &mut KeyPtr) -> Layout {
        Layout::cell::<T>(ptr.advance())
    }
}
