//! The two layout capabilities every storable type implements.
//!
//! Which layout a type gets is decided statically by the impls below and in
//! [`crate::impls`], never by inspecting values at runtime.

use crate::error::Result;
use serde::{de::DeserializeOwned, Serialize};
use tessera_core::{Key, KeyPtr};
use tessera_env::{Env, Host};

/// A type stored as one encoded blob under a single key.
///
/// The hooks run on every sub-value reachable from a packed root after it
/// is decoded (`pull_packed`) or before it is encoded (`push_packed`,
/// `clear_packed`). Leaves keep the no-op defaults; containers recurse
/// element-wise; user types forward to their fields.
pub trait PackedLayout: Serialize + DeserializeOwned {
    /// Whether [`PackedLayout::clear_packed`] has any effect. While it is
    /// `false` a cell can be cleared without decoding its value first.
    const REQUIRES_DEEP_CLEAN_UP: bool = false;

    /// Refresh internal state after the enclosing root was decoded at `at`.
    fn pull_packed<H: Host>(&mut self, _at: &Key, _env: &mut Env<H>) -> Result<()> {
        Ok(())
    }

    /// Prepare sub-values before the enclosing root is written at `at`.
    fn push_packed<H: Host>(&self, _at: &Key, _env: &mut Env<H>) -> Result<()> {
        Ok(())
    }

    /// Release sub-values before the enclosing root is cleared at `at`.
    fn clear_packed<H: Host>(&self, _at: &Key, _env: &mut Env<H>) -> Result<()> {
        Ok(())
    }
}

/// A type whose parts are spread over consecutive storage keys.
///
/// Implementations visit their parts in a fixed order, depth first, and
/// reserve keys only through [`KeyPtr::advance`]. Pull, push and clear must
/// reserve exactly [`SpreadLayout::FOOTPRINT`] keys each, so that siblings
/// laid out after this value always land on the same keys.
pub trait SpreadLayout: Sized {
    /// Number of keys the value reserves from the key pointer.
    const FOOTPRINT: u64;

    /// Load a value whose first part lives at the next key of `ptr`.
    fn pull_spread<H: Host>(ptr: &mut KeyPtr, env: &mut Env<H>) -> Result<Self>;

    /// Write the value starting at the next key of `ptr`.
    fn push_spread<H: Host>(&mut self, ptr: &mut KeyPtr, env: &mut Env<H>) -> Result<()>;

    /// Remove the value starting at the next key of `ptr`.
    fn clear_spread<H: Host>(&mut self, ptr: &mut KeyPtr, env: &mut Env<H>) -> Result<()>;
}
