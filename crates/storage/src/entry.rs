//! A cached storage cell with deferred writes.

use crate::error::{Result, StorageError};
use crate::packed::{pull_packed_root_opt, push_packed_root};
use crate::traits::{PackedLayout, SpreadLayout};
use tessera_core::{Key, KeyPtr};
use tessera_env::{Env, Host};
use tracing::trace;

/// Relation between a cached value and the host's copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// The value mirrors the host.
    Pulled,
    /// The value is newer than the host's copy.
    Updated,
    /// The value is absent; the host slot must be cleared.
    Cleared,
}

/// A single cached value and its [`EntryState`].
///
/// Reads never touch the host; writes are deferred until the entry is
/// flushed with [`StorageEntry::push_packed_root`] or through
/// [`SpreadLayout::push_spread`]. A flush writes an updated entry once and
/// then marks it pulled, so flushing again without a `set` is free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEntry<T> {
    value: Option<T>,
    state: EntryState,
}

impl<T> StorageEntry<T> {
    /// A freshly set value, not yet written.
    pub fn new(value: T) -> Self {
        Self {
            value: Some(value),
            state: EntryState::Updated,
        }
    }

    /// A value just read from the host, or `None` if the host had nothing.
    pub fn from_pulled(value: Option<T>) -> Self {
        match value {
            Some(value) => Self {
                value: Some(value),
                state: EntryState::Pulled,
            },
            None => Self::cleared(),
        }
    }

    /// An absent value.
    pub fn cleared() -> Self {
        Self {
            value: None,
            state: EntryState::Cleared,
        }
    }

    pub fn state(&self) -> EntryState {
        self.state
    }

    /// Check if the entry holds no value.
    pub fn is_cleared(&self) -> bool {
        self.state == EntryState::Cleared
    }

    /// Check if a flush would touch the host.
    pub fn is_dirty(&self) -> bool {
        self.state != EntryState::Pulled
    }

    /// The value, failing with [`StorageError::EmptyEntry`] if cleared.
    pub fn get(&self) -> Result<&T> {
        self.value.as_ref().ok_or(StorageError::EmptyEntry)
    }

    /// The value for mutation. Marks the entry updated.
    pub fn get_mut(&mut self) -> Result<&mut T> {
        let value = self.value.as_mut().ok_or(StorageError::EmptyEntry)?;
        self.state = EntryState::Updated;
        Ok(value)
    }

    /// The value, if any.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Replace the value. Marks the entry updated.
    pub fn set(&mut self, value: T) {
        self.value = Some(value);
        self.state = EntryState::Updated;
    }

    /// Drop the value. Marks the entry cleared.
    pub fn clear(&mut self) {
        self.value = None;
        self.state = EntryState::Cleared;
    }

    /// Take the value out, leaving the entry cleared.
    pub fn take(&mut self) -> Option<T> {
        self.state = EntryState::Cleared;
        self.value.take()
    }
}

impl<T: PackedLayout> StorageEntry<T> {
    /// Read the entry stored packed at `key`.
    ///
    /// A missing key yields a cleared entry rather than an error.
    pub fn pull_packed_root<H: Host>(key: &Key, env: &mut Env<H>) -> Result<Self> {
        Ok(Self::from_pulled(pull_packed_root_opt(key, env)?))
    }

    /// Flush the entry to `key`.
    pub fn push_packed_root<H: Host>(&mut self, key: &Key, env: &mut Env<H>) -> Result<()> {
        match self.state {
            EntryState::Pulled => {}
            EntryState::Updated => {
                if let Some(value) = &self.value {
                    push_packed_root(value, key, env)?;
                }
                self.state = EntryState::Pulled;
                trace!(%key, "flushed updated entry");
            }
            EntryState::Cleared => {
                env.clear_contract_storage(key)?;
                trace!(%key, "flushed cleared entry");
            }
        }
        Ok(())
    }
}

impl<T> SpreadLayout for StorageEntry<T>
where
    T: SpreadLayout + Default,
{
    const FOOTPRINT: u64 = T::FOOTPRINT;

    fn pull_spread<H: Host>(ptr: &mut KeyPtr, env: &mut Env<H>) -> Result<Self> {
        let start = ptr.clone();
        match T::pull_spread(ptr, env) {
            Ok(value) => Ok(Self::from_pulled(Some(value))),
            Err(err) if err.is_not_found() => {
                *ptr = start;
                ptr.skip(T::FOOTPRINT);
                Ok(Self::cleared())
            }
            Err(err) => Err(err),
        }
    }

    fn push_spread<H: Host>(&mut self, ptr: &mut KeyPtr, env: &mut Env<H>) -> Result<()> {
        match self.state {
            EntryState::Pulled => ptr.skip(T::FOOTPRINT),
            EntryState::Updated => {
                if let Some(value) = self.value.as_mut() {
                    value.push_spread(ptr, env)?;
                }
                self.state = EntryState::Pulled;
            }
            EntryState::Cleared => clear_stored::<T, H>(ptr, env)?,
        }
        Ok(())
    }

    fn clear_spread<H: Host>(&mut self, ptr: &mut KeyPtr, env: &mut Env<H>) -> Result<()> {
        match self.value.as_mut() {
            Some(value) => value.clear_spread(ptr, env)?,
            None => clear_stored::<T, H>(ptr, env)?,
        }
        self.clear();
        Ok(())
    }
}

/// Clear whatever `T` currently occupies at the cursor.
///
/// The cached value is gone once an entry is cleared, so the stored one is
/// pulled back to learn which cells it spans. Nothing stored falls back to
/// clearing the cells of `T::default()`.
fn clear_stored<T, H>(ptr: &mut KeyPtr, env: &mut Env<H>) -> Result<()>
where
    T: SpreadLayout + Default,
    H: Host,
{
    let start = ptr.clone();
    let mut stored = match T::pull_spread(ptr, env) {
        Ok(stored) => stored,
        Err(err) if err.is_not_found() => T::default(),
        Err(err) => return Err(err),
    };
    *ptr = start;
    stored.clear_spread(ptr, env)
}
