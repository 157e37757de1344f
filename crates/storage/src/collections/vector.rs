//! A growable vector with lazily loaded elements.

use crate::error::{Result, StorageError};
use crate::layout::{FieldLayout, Layout, StorageLayout};
use crate::lazy_index_map::LazyIndexMap;
use crate::packed::{forward_clear_packed, forward_pull_packed, forward_push_packed};
use crate::traits::{PackedLayout, SpreadLayout};
use tessera_core::KeyPtr;
use tessera_env::{Env, Host};

/// A vector whose length is one spread cell and whose elements are loaded
/// on first access.
///
/// Valid indices are always `[0, len)`. Mutations are cached and written
/// when the vector is pushed.
#[derive(Debug)]
pub struct Vector<T> {
    len: u32,
    elems: LazyIndexMap<T>,
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Vector<T> {
    /// An empty vector.
    pub fn new() -> Self {
        Self {
            len: 0,
            elems: LazyIndexMap::new(),
        }
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn check_bounds(&self, index: u32) -> Result<()> {
        if index < self.len {
            Ok(())
        } else {
            Err(StorageError::IndexOutOfBounds {
                index,
                len: self.len,
            })
        }
    }

    /// Append an element.
    pub fn push(&mut self, value: T) -> Result<()> {
        if self.len == u32::MAX {
            return Err(StorageError::CapacityExceeded);
        }
        self.elems.set(self.len, value);
        self.len += 1;
        Ok(())
    }

    /// Overwrite the element at `index`.
    pub fn set(&mut self, index: u32, value: T) -> Result<()> {
        self.check_bounds(index)?;
        self.elems.set(index, value);
        Ok(())
    }

    /// Drop the last element without reading it.
    pub fn remove_last(&mut self) -> Result<()> {
        if self.is_empty() {
            return Err(StorageError::EmptyVector);
        }
        self.len -= 1;
        self.elems.delete(self.len);
        Ok(())
    }

    /// Remove every element. Storage is cleared on the next push.
    pub fn clear(&mut self) {
        for index in 0..self.len {
            self.elems.delete(index);
        }
        self.len = 0;
    }
}

impl<T: PackedLayout> Vector<T> {
    /// The element at `index`.
    pub fn get<H: Host>(&mut self, index: u32, env: &mut Env<H>) -> Result<&T> {
        self.check_bounds(index)?;
        self.elems.get(index, env)
    }

    /// The element at `index` for mutation.
    pub fn get_mut<H: Host>(&mut self, index: u32, env: &mut Env<H>) -> Result<&mut T> {
        self.check_bounds(index)?;
        self.elems.get_mut(index, env)
    }

    /// The last element.
    pub fn last<H: Host>(&mut self, env: &mut Env<H>) -> Result<&T> {
        match self.len.checked_sub(1) {
            Some(index) => self.elems.get(index, env),
            None => Err(StorageError::EmptyVector),
        }
    }

    /// Remove and return the last element.
    pub fn pop<H: Host>(&mut self, env: &mut Env<H>) -> Result<T> {
        if self.is_empty() {
            return Err(StorageError::EmptyVector);
        }
        let index = self.len - 1;
        let value = self.elems.remove(index, env)?.ok_or(StorageError::EmptyEntry)?;
        self.len = index;
        Ok(value)
    }

    /// Replace the element at `index` with the last one and return it.
    pub fn swap_remove<H: Host>(&mut self, index: u32, env: &mut Env<H>) -> Result<T> {
        self.check_bounds(index)?;
        let last = self.pop(env)?;
        if index == self.len {
            return Ok(last);
        }
        let removed = self.elems.remove(index, env)?.ok_or(StorageError::EmptyEntry)?;
        self.elems.set(index, last);
        Ok(removed)
    }
}

impl<T: PackedLayout> SpreadLayout for Vector<T> {
    const FOOTPRINT: u64 = 2;

    fn pull_spread<H: Host>(ptr: &mut KeyPtr, env: &mut Env<H>) -> Result<Self> {
        let len = forward_pull_packed::<u32, _>(ptr, env)?;
        let elems = LazyIndexMap::pull_spread(ptr, env)?;
        Ok(Self { len, elems })
    }

    fn push_spread<H: Host>(&mut self, ptr: &mut KeyPtr, env: &mut Env<H>) -> Result<()> {
        forward_push_packed(&self.len, ptr, env)?;
        self.elems.push_spread(ptr, env)
    }

    fn clear_spread<H: Host>(&mut self, ptr: &mut KeyPtr, env: &mut Env<H>) -> Result<()> {
        forward_clear_packed(&self.len, ptr, env)?;
        self.elems.clear_spread(ptr, env)?;
        for index in 0..self.len {
            if !self.elems.is_cached(index) {
                self.elems.clear_at(index, env)?;
            }
        }
        self.elems.clear_cache();
        self.len = 0;
        Ok(())
    }
}

impl<T> StorageLayout for Vector<T> {
    fn layout(ptr: &mut KeyPtr) -> Layout {
        Layout::structure(vec![
            FieldLayout::new("len", <u32 as StorageLayout>::layout(ptr)),
            FieldLayout::new("elems", <LazyIndexMap<T> as StorageLayout>::layout(ptr)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spread::{pull_spread_root, push_spread_root};
    use tessera_core::Key;
    use tessera_env::MemoryHost;

    fn setup() -> (Vector<u32>, Env<MemoryHost>) {
        (Vector::new(), Env::new(MemoryHost::new()))
    }

    #[test]
    fn test_push_pop() {
        let (mut vec, mut env) = setup();
        vec.push(10).unwrap();
        vec.push(20).unwrap();

        assert_eq!(vec.pop(&mut env).unwrap(), 20);
        assert_eq!(vec.len(), 1);
        assert_eq!(*vec.get(0, &mut env).unwrap(), 10);
        assert_eq!(*vec.last(&mut env).unwrap(), 10);
    }

    #[test]
    fn test_out_of_bounds() {
        let (mut vec, mut env) = setup();
        vec.push(1).unwrap();

        assert!(matches!(
            vec.get(1, &mut env),
            Err(StorageError::IndexOutOfBounds { index: 1, len: 1 })
        ));
        assert!(vec.set(5, 0).is_err());
    }

    #[test]
    fn test_empty_errors() {
        let (mut vec, mut env) = setup();
        assert!(matches!(vec.pop(&mut env), Err(StorageError::EmptyVector)));
        assert!(matches!(vec.remove_last(), Err(StorageError::EmptyVector)));
        assert!(matches!(vec.last(&mut env), Err(StorageError::EmptyVector)));
    }

    #[test]
    fn test_swap_remove() {
        let (mut vec, mut env) = setup();
        for value in [1, 2, 3] {
            vec.push(value).unwrap();
        }

        assert_eq!(vec.swap_remove(0, &mut env).unwrap(), 1);
        assert_eq!(vec.len(), 2);
        assert_eq!(*vec.get(0, &mut env).unwrap(), 3);
        assert_eq!(vec.swap_remove(1, &mut env).unwrap(), 2);
    }

    #[test]
    fn test_clear_then_persist() {
        let (mut vec, mut env) = setup();
        vec.push(1).unwrap();
        vec.push(2).unwrap();
        push_spread_root(&mut vec, &Key::zero(), &mut env).unwrap();
        assert_eq!(env.host().len(), 3);

        vec.clear();
        assert!(vec.is_empty());
        push_spread_root(&mut vec, &Key::zero(), &mut env).unwrap();
        assert_eq!(env.host().len(), 1);

        let pulled: Vector<u32> = pull_spread_root(&Key::zero(), &mut env);
        assert!(pulled.is_empty());
    }

    #[test]
    fn test_clear_spread_clears_uncached() {
        let (mut vec, mut env) = setup();
        for value in 0..4 {
            vec.push(value).unwrap();
        }
        push_spread_root(&mut vec, &Key::zero(), &mut env).unwrap();

        let mut pulled: Vector<u32> = pull_spread_root(&Key::zero(), &mut env);
        assert_eq!(*pulled.get(1, &mut env).unwrap(), 1);
        let mut ptr = KeyPtr::new(Key::zero());
        pulled.clear_spread(&mut ptr, &mut env).unwrap();

        assert!(env.host().is_empty());
        assert_eq!(ptr.current(), Key::from_u64(2));
    }

    #[test]
    fn test_layout() {
        let layout = crate::layout::layout_at::<Vector<u8>>(&Key::zero());
        assert_eq!(layout.cell_keys(), vec![Key::from_u64(1)]);
    }
}
