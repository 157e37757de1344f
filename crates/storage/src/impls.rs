//! Layout impls for the built-in types.
//!
//! Leaves have no-op packed hooks. Collections, options, boxes and tuples
//! recurse into their elements. Under a spread parent all of them are
//! stored packed in a single cell.

use crate::error::Result;
use crate::layout::{Layout, StorageLayout};
use crate::traits::{PackedLayout, SpreadLayout};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tessera_core::{Address, Key, KeyPtr, U256};
use tessera_env::{Env, Host};

/// Expands to a `SpreadLayout` body that stores `Self` packed in one cell.
#[doc(hidden)]
#[macro_export]
macro_rules! __spread_forwarded_to_packed {
    () => {
        const FOOTPRINT: u64 = 1;

        fn pull_spread<H: $crate::Host>(
            ptr: &mut $crate::KeyPtr,
            env: &mut $crate::Env<H>,
        ) -> $crate::Result<Self> {
            $crate::forward_pull_packed(ptr, env)
        }

        fn push_spread<H: $crate::Host>(
            &mut self,
            ptr: &mut $crate::KeyPtr,
            env: &mut $crate::Env<H>,
        ) -> $crate::Result<()> {
            $crate::forward_push_packed(&*self, ptr, env)
        }

        fn clear_spread<H: $crate::Host>(
            &mut self,
            ptr: &mut $crate::KeyPtr,
            env: &mut $crate::Env<H>,
        ) -> $crate::Result<()> {
            $crate::forward_clear_packed(&*self, ptr, env)
        }
    };
}

macro_rules! impl_leaf {
    ($($ty:ty),* $(,)?) => {
        $(
            impl PackedLayout for $ty {}

            impl SpreadLayout for $ty {
                $crate::__spread_forwarded_to_packed!();
            }

            impl StorageLayout for $ty {
                fn layout(ptr: &mut KeyPtr) -> Layout {
                    Layout::cell::<Self>(ptr.advance())
                }
            }
        )*
    };
}

impl_leaf!(
    bool, u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, char, (), String, U256, Key, Address,
);

/// Implements spread and layout for a generic type that is packed as a whole.
macro_rules! impl_packed_whole {
    ([$($gen:tt)*] $ty:ty) => {
        impl<$($gen)*> SpreadLayout for $ty
        where
            $ty: PackedLayout,
        {
            $crate::__spread_forwarded_to_packed!();
        }

        impl<$($gen)*> StorageLayout for $ty {
            fn layout(ptr: &mut KeyPtr) -> Layout {
                Layout::cell::<Self>(ptr.advance())
            }
        }
    };
}

impl<T: PackedLayout> PackedLayout for Vec<T> {
    const REQUIRES_DEEP_CLEAN_UP: bool = T::REQUIRES_DEEP_CLEAN_UP;

    fn pull_packed<H: Host>(&mut self, at: &Key, env: &mut Env<H>) -> Result<()> {
        for elem in self.iter_mut() {
            elem.pull_packed(at, env)?;
        }
        Ok(())
    }

    fn push_packed<H: Host>(&self, at: &Key, env: &mut Env<H>) -> Result<()> {
        for elem in self {
            elem.push_packed(at, env)?;
        }
        Ok(())
    }

    fn clear_packed<H: Host>(&self, at: &Key, env: &mut Env<H>) -> Result<()> {
        for elem in self {
            elem.clear_packed(at, env)?;
        }
        Ok(())
    }
}

impl_packed_whole!([T] Vec<T>);

impl<T: PackedLayout> PackedLayout for Option<T> {
    const REQUIRES_DEEP_CLEAN_UP: bool = T::REQUIRES_DEEP_CLEAN_UP;

    fn pull_packed<H: Host>(&mut self, at: &Key, env: &mut Env<H>) -> Result<()> {
        match self {
            Some(value) => value.pull_packed(at, env),
            None => Ok(()),
        }
    }

    fn push_packed<H: Host>(&self, at: &Key, env: &mut Env<H>) -> Result<()> {
        match self {
            Some(value) => value.push_packed(at, env),
            None => Ok(()),
        }
    }

    fn clear_packed<H: Host>(&self, at: &Key, env: &mut Env<H>) -> Result<()> {
        match self {
            Some(value) => value.clear_packed(at, env),
            None => Ok(()),
        }
    }
}

impl_packed_whole!([T] Option<T>);

impl<T: PackedLayout> PackedLayout for Box<T> {
    const REQUIRES_DEEP_CLEAN_UP: bool = T::REQUIRES_DEEP_CLEAN_UP;

    fn pull_packed<H: Host>(&mut self, at: &Key, env: &mut Env<H>) -> Result<()> {
        self.as_mut().pull_packed(at, env)
    }

    fn push_packed<H: Host>(&self, at: &Key, env: &mut Env<H>) -> Result<()> {
        self.as_ref().push_packed(at, env)
    }

    fn clear_packed<H: Host>(&self, at: &Key, env: &mut Env<H>) -> Result<()> {
        self.as_ref().clear_packed(at, env)
    }
}

impl_packed_whole!([T] Box<T>);

impl<T, const N: usize> PackedLayout for [T; N]
where
    T: PackedLayout,
    [T; N]: Serialize + DeserializeOwned,
{
    const REQUIRES_DEEP_CLEAN_UP: bool = T::REQUIRES_DEEP_CLEAN_UP;

    fn pull_packed<H: Host>(&mut self, at: &Key, env: &mut Env<H>) -> Result<()> {
        for elem in self.iter_mut() {
            elem.pull_packed(at, env)?;
        }
        Ok(())
    }

    fn push_packed<H: Host>(&self, at: &Key, env: &mut Env<H>) -> Result<()> {
        for elem in self {
            elem.push_packed(at, env)?;
        }
        Ok(())
    }

    fn clear_packed<H: Host>(&self, at: &Key, env: &mut Env<H>) -> Result<()> {
        for elem in self {
            elem.clear_packed(at, env)?;
        }
        Ok(())
    }
}

impl_packed_whole!([T, const N: usize] [T; N]);

impl<T: PackedLayout + Ord> PackedLayout for BTreeSet<T> {
    const REQUIRES_DEEP_CLEAN_UP: bool = T::REQUIRES_DEEP_CLEAN_UP;

    fn pull_packed<H: Host>(&mut self, at: &Key, env: &mut Env<H>) -> Result<()> {
        // Elements of a set are immutable in place; rebuild it.
        for mut elem in std::mem::take(self) {
            elem.pull_packed(at, env)?;
            self.insert(elem);
        }
        Ok(())
    }

    fn push_packed<H: Host>(&self, at: &Key, env: &mut Env<H>) -> Result<()> {
        for elem in self {
            elem.push_packed(at, env)?;
        }
        Ok(())
    }

    fn clear_packed<H: Host>(&self, at: &Key, env: &mut Env<H>) -> Result<()> {
        for elem in self {
            elem.clear_packed(at, env)?;
        }
        Ok(())
    }
}

impl_packed_whole!([T] BTreeSet<T>);

impl<K, V> PackedLayout for BTreeMap<K, V>
where
    K: PackedLayout + Ord,
    V: PackedLayout,
{
    const REQUIRES_DEEP_CLEAN_UP: bool = K::REQUIRES_DEEP_CLEAN_UP || V::REQUIRES_DEEP_CLEAN_UP;

    fn pull_packed<H: Host>(&mut self, at: &Key, env: &mut Env<H>) -> Result<()> {
        for (mut key, mut value) in std::mem::take(self) {
            key.pull_packed(at, env)?;
            value.pull_packed(at, env)?;
            self.insert(key, value);
        }
        Ok(())
    }

    fn push_packed<H: Host>(&self, at: &Key, env: &mut Env<H>) -> Result<()> {
        for key in self.keys() {
            key.push_packed(at, env)?;
        }
        for value in self.values() {
            value.push_packed(at, env)?;
        }
        Ok(())
    }

    fn clear_packed<H: Host>(&self, at: &Key, env: &mut Env<H>) -> Result<()> {
        for key in self.keys() {
            key.clear_packed(at, env)?;
        }
        for value in self.values() {
            value.clear_packed(at, env)?;
        }
        Ok(())
    }
}

impl_packed_whole!([K, V] BTreeMap<K, V>);

macro_rules! impl_tuple {
    ($($name:ident),+) => {
        #[allow(non_snake_case)]
        impl<$($name: PackedLayout),+> PackedLayout for ($($name,)+) {
            const REQUIRES_DEEP_CLEAN_UP: bool = false $(|| $name::REQUIRES_DEEP_CLEAN_UP)+;

            fn pull_packed<H: Host>(&mut self, at: &Key, env: &mut Env<H>) -> Result<()> {
                let ($($name,)+) = self;
                $($name.pull_packed(at, env)?;)+
                Ok(())
            }

            fn push_packed<H: Host>(&self, at: &Key, env: &mut Env<H>) -> Result<()> {
                let ($($name,)+) = self;
                $($name.push_packed(at, env)?;)+
                Ok(())
            }

            fn clear_packed<H: Host>(&self, at: &Key, env: &mut Env<H>) -> Result<()> {
                let ($($name,)+) = self;
                $($name.clear_packed(at, env)?;)+
                Ok(())
            }
        }

        impl_packed_whole!([$($name),+] ($($name,)+));
    };
}

impl_tuple!(A);
impl_tuple!(A, B);
impl_tuple!(A, B, C);
impl_tuple!(A, B, C, D);
