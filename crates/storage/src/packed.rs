//! The packed layout engine: a whole value under exactly one key.

use crate::error::Result;
use crate::traits::PackedLayout;
use tessera_core::{Key, KeyPtr};
use tessera_env::{Env, Host, StorageResult};

/// Load the value stored at `key` and run its pull hooks.
///
/// A missing key is an error carrying [`tessera_core::ReturnCode::KeyNotFound`].
pub fn try_pull_packed_root<T, H>(key: &Key, env: &mut Env<H>) -> Result<T>
where
    T: PackedLayout,
    H: Host,
{
    let mut value: T = env.get_contract_storage(key)?;
    value.pull_packed(key, env)?;
    Ok(value)
}

/// Load the value stored at `key`, or `None` if nothing is stored there.
pub fn pull_packed_root_opt<T, H>(key: &Key, env: &mut Env<H>) -> Result<Option<T>>
where
    T: PackedLayout,
    H: Host,
{
    match env.get_contract_storage_opt::<T>(key)? {
        Some(mut value) => {
            value.pull_packed(key, env)?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Load the value stored at `key`.
///
/// # Panics
///
/// If the key is missing, the host fails, or the bytes do not decode as `T`.
/// Use [`try_pull_packed_root`] where absence is expected.
pub fn pull_packed_root<T, H>(key: &Key, env: &mut Env<H>) -> T
where
    T: PackedLayout,
    H: Host,
{
    match try_pull_packed_root(key, env) {
        Ok(value) => value,
        Err(err) => panic!("failed to pull packed root at {}: {}", key, err),
    }
}

/// Load the value stored at `key`, reporting the host code instead of failing.
///
/// When the code is not success, the value is `T::default()`. Decoding
/// failures are still errors.
pub fn pull_packed_root_result<T, H>(key: &Key, env: &mut Env<H>) -> Result<StorageResult<T>>
where
    T: PackedLayout + Default,
    H: Host,
{
    let mut result = env.get_contract_storage_result::<T>(key)?;
    if result.is_success() {
        result.value.pull_packed(key, env)?;
    }
    Ok(result)
}

/// Run the push hooks of `value`, then write it at `key`.
pub fn push_packed_root<T, H>(value: &T, key: &Key, env: &mut Env<H>) -> Result<()>
where
    T: PackedLayout,
    H: Host,
{
    value.push_packed(key, env)?;
    env.set_contract_storage(key, value)?;
    Ok(())
}

/// Run the clear hooks of `value`, then remove whatever is stored at `key`.
pub fn clear_packed_root<T, H>(value: &T, key: &Key, env: &mut Env<H>) -> Result<()>
where
    T: PackedLayout,
    H: Host,
{
    value.clear_packed(key, env)?;
    env.clear_contract_storage(key)?;
    Ok(())
}

/// Pull a packed value from the next key of `ptr`.
pub fn forward_pull_packed<T, H>(ptr: &mut KeyPtr, env: &mut Env<H>) -> Result<T>
where
    T: PackedLayout,
    H: Host,
{
    let key = ptr.advance();
    try_pull_packed_root(&key, env)
}

/// Push a packed value to the next key of `ptr`.
pub fn forward_push_packed<T, H>(value: &T, ptr: &mut KeyPtr, env: &mut Env<H>) -> Result<()>
where
    T: PackedLayout,
    H: Host,
{
    let key = ptr.advance();
    push_packed_root(value, &key, env)
}

/// Clear a packed value at the next key of `ptr`.
pub fn forward_clear_packed<T, H>(value: &T, ptr: &mut KeyPtr, env: &mut Env<H>) -> Result<()>
where
    T: PackedLayout,
    H: Host,
{
    let key = ptr.advance();
    clear_packed_root(value, &key, env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tessera_core::ReturnCode;
    use tessera_env::MemoryHost;

    fn setup() -> Env<MemoryHost> {
        Env::new(MemoryHost::new())
    }

    #[test]
    fn test_push_pull_packed_root() {
        let mut env = setup();
        let key = Key::from_u64(11);
        let value = (7u32, String::from("seven"), vec![Some(1i64), None]);

        push_packed_root(&value, &key, &mut env).unwrap();
        let pulled: (u32, String, Vec<Option<i64>>) = pull_packed_root(&key, &mut env);
        assert_eq!(pulled, value);
        assert_eq!(env.host().stats().writes, 1);
        assert_eq!(env.host().stats().reads, 1);
    }

    #[test]
    fn test_pull_missing_is_not_found() {
        let mut env = setup();
        let result: Result<u32> = try_pull_packed_root(&Key::zero(), &mut env);
        assert!(result.unwrap_err().is_not_found());

        let opt: Option<u32> = pull_packed_root_opt(&Key::zero(), &mut env).unwrap();
        assert_eq!(opt, None);
    }

    #[test]
    #[should_panic(expected = "failed to pull packed root")]
    fn test_pull_packed_root_panics_on_missing() {
        let mut env = setup();
        let _: u32 = pull_packed_root(&Key::zero(), &mut env);
    }

    #[test]
    fn test_pull_result_gives_default_placeholder() {
        let mut env = setup();
        let result: StorageResult<BTreeMap<u8, String>> =
            pull_packed_root_result(&Key::from_u64(3), &mut env).unwrap();

        assert_eq!(result.code, ReturnCode::KeyNotFound);
        assert!(result.value.is_empty());
    }

    #[test]
    fn test_clear_packed_root() {
        let mut env = setup();
        let key = Key::from_u64(2);
        push_packed_root(&true, &key, &mut env).unwrap();
        clear_packed_root(&true, &key, &mut env).unwrap();

        assert!(env.host().is_empty());
        assert_eq!(env.host().stats().clears, 1);
    }

    #[test]
    fn test_forwarding_advances_first() {
        let mut env = setup();
        let mut ptr = KeyPtr::new(Key::zero());

        forward_push_packed(&1u8, &mut ptr, &mut env).unwrap();
        forward_push_packed(&2u8, &mut ptr, &mut env).unwrap();

        assert_eq!(env.host().keys(), vec![Key::from_u64(1), Key::from_u64(2)]);

        let mut ptr = KeyPtr::new(Key::zero());
        assert_eq!(forward_pull_packed::<u8, _>(&mut ptr, &mut env).unwrap(), 1);
        assert_eq!(forward_pull_packed::<u8, _>(&mut ptr, &mut env).unwrap(), 2);
    }
}
