//! The spread layout engine: a value's parts over consecutive keys.
//!
//! Root functions copy the root key into a fresh [`KeyPtr`], so the caller's
//! key is never moved. Each part reserves its keys through the pointer in
//! declaration order; parts stored packed reserve exactly one.

use crate::error::Result;
use crate::traits::SpreadLayout;
use tessera_core::{Key, KeyPtr};
use tessera_env::{Env, Host};
use tracing::debug;

/// Pull a spread value from the next keys of `ptr`.
pub fn pull_spread<T, H>(ptr: &mut KeyPtr, env: &mut Env<H>) -> Result<T>
where
    T: SpreadLayout,
    H: Host,
{
    T::pull_spread(ptr, env)
}

/// Push a spread value to the next keys of `ptr`.
pub fn push_spread<T, H>(value: &mut T, ptr: &mut KeyPtr, env: &mut Env<H>) -> Result<()>
where
    T: SpreadLayout,
    H: Host,
{
    value.push_spread(ptr, env)
}

/// Clear a spread value at the next keys of `ptr`.
pub fn clear_spread<T, H>(value: &mut T, ptr: &mut KeyPtr, env: &mut Env<H>) -> Result<()>
where
    T: SpreadLayout,
    H: Host,
{
    value.clear_spread(ptr, env)
}

/// Load the spread value rooted at `root`.
pub fn try_pull_spread_root<T, H>(root: &Key, env: &mut Env<H>) -> Result<T>
where
    T: SpreadLayout,
    H: Host,
{
    let mut ptr = KeyPtr::new(*root);
    T::pull_spread(&mut ptr, env)
}

/// Load the spread value rooted at `root`.
///
/// # Panics
///
/// If any part is missing or fails to decode.
pub fn pull_spread_root<T, H>(root: &Key, env: &mut Env<H>) -> T
where
    T: SpreadLayout,
    H: Host,
{
    match try_pull_spread_root(root, env) {
        Ok(value) => value,
        Err(err) => panic!("failed to pull spread root at {}: {}", root, err),
    }
}

/// Write the spread value rooted at `root`.
pub fn push_spread_root<T, H>(value: &mut T, root: &Key, env: &mut Env<H>) -> Result<()>
where
    T: SpreadLayout,
    H: Host,
{
    let mut ptr = KeyPtr::new(*root);
    value.push_spread(&mut ptr, env)?;
    debug!(%root, footprint = T::FOOTPRINT, "pushed spread root");
    Ok(())
}

/// Remove the spread value rooted at `root`.
pub fn clear_spread_root<T, H>(value: &mut T, root: &Key, env: &mut Env<H>) -> Result<()>
where
    T: SpreadLayout,
    H: Host,
{
    let mut ptr = KeyPtr::new(*root);
    value.clear_spread(&mut ptr, env)?;
    debug!(%root, footprint = T::FOOTPRINT, "cleared spread root");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_env::MemoryHost;

    #[test]
    fn test_leaf_roundtrip_under_spread_root() {
        let mut env = Env::new(MemoryHost::new());
        let root = Key::from_u64(100);
        let mut value = String::from("leaf");

        push_spread_root(&mut value, &root, &mut env).unwrap();
        // Leaves are forwarded to packed storage one slot past the root.
        assert!(env.host().raw(&Key::from_u64(101)).is_some());
        assert!(env.host().raw(&root).is_none());

        let pulled: String = pull_spread_root(&root, &mut env);
        assert_eq!(pulled, "leaf");
    }

    #[test]
    fn test_clear_spread_root() {
        let mut env = Env::new(MemoryHost::new());
        let root = Key::zero();
        let mut value = (1u32, 2u64);

        push_spread_root(&mut value, &root, &mut env).unwrap();
        clear_spread_root(&mut value, &root, &mut env).unwrap();
        assert!(env.host().is_empty());

        let result: Result<(u32, u64)> = try_pull_spread_root(&root, &mut env);
        assert!(result.unwrap_err().is_not_found());
    }

    #[test]
    #[should_panic(expected = "failed to pull spread root")]
    fn test_pull_spread_root_panics_on_missing() {
        let mut env = Env::new(MemoryHost::new());
        let _: u64 = pull_spread_root(&Key::zero(), &mut env);
    }
}
