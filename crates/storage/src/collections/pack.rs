//! Whole-value packed storage for types that would otherwise be spread.

use crate::error::Result;
use crate::layout::{Layout, StorageLayout};
use crate::packed::{forward_clear_packed, forward_pull_packed, forward_push_packed};
use crate::traits::{PackedLayout, SpreadLayout};
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};
use tessera_core::{Key, KeyPtr};
use tessera_env::{Env, Host};

/// Stores `T` as one packed cell, trading partial access for a single round
/// trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pack<T> {
    inner: T,
}

impl<T> Pack<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> Deref for Pack<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> DerefMut for Pack<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

impl<T: PackedLayout> PackedLayout for Pack<T> {
    const REQUIRES_DEEP_CLEAN_UP: bool = T::REQUIRES_DEEP_CLEAN_UP;

    fn pull_packed<H: Host>(&mut self, at: &Key, env: &mut Env<H>) -> Result<()> {
        self.inner.pull_packed(at, env)
    }

    fn push_packed<H: Host>(&self, at: &Key, env: &mut Env<H>) -> Result<()> {
        self.inner.push_packed(at, env)
    }

    fn clear_packed<H: Host>(&self, at: &Key, env: &mut Env<H>) -> Result<()> {
        self.inner.clear_packed(at, env)
    }
}

impl<T: PackedLayout> SpreadLayout for Pack<T> {
    const FOOTPRINT: u64 = 1;

    fn pull_spread<H: Host>(ptr: &mut KeyPtr, env: &mut Env<H>) -> Result<Self> {
        forward_pull_packed(ptr, env)
    }

    fn push_spread<H: Host>(&mut self, ptr: &mut KeyPtr, env: &mut Env<H>) -> Result<()> {
        forward_push_packed(&*self, ptr, env)
    }

    fn clear_spread<H: Host>(&mut self, ptr: &mut KeyPtr, env: &mut Env<H>) -> Result<()> {
        forward_clear_packed(&*self, ptr, env)
    }
}

impl<T> StorageLayout for Pack<T> {
    fn layout(ptr: &mut KeyPtr) -> Layout {
        Layout::cell::<T>(ptr.advance())
    }
}
