//! Declarative impls of the layout traits for user structs.
//!
//! Fields are visited in the order they are listed, which must match the
//! struct's declaration order. Changing that order, or moving a type between
//! packed and spread, changes where its data lives.

/// Implements [`SpreadLayout`](crate::SpreadLayout) and
/// [`StorageLayout`](crate::StorageLayout) for a struct whose fields are
/// spread over consecutive keys.
///
/// Generic structs list their type parameters after `impl`. Every field type
/// must then be storable, which the generated impls require in a `where`
/// clause.
///
/// ```
/// use tessera_storage::{spread_layout, Lazy, Vector};
///
/// struct Ledger {
///     owner: String,
///     total: Lazy<u128>,
///     entries: Vector<u64>,
/// }
///
/// spread_layout!(Ledger {
///     owner: String,
///     total: Lazy<u128>,
///     entries: Vector<u64>,
/// });
///
/// struct Pair<T> {
///     first: T,
///     second: Lazy<T>,
/// }
///
/// spread_layout!(impl<T> Pair<T> {
///     first: T,
///     second: Lazy<T>,
/// });
/// ```
#[macro_export]
macro_rules! spread_layout {
    (impl<$($gen:ident),* $(,)?> $ty:ty { $($field:ident : $fty:ty),* $(,)? }) => {
        impl<$($gen),*> $crate::SpreadLayout for $ty
        where
            $($fty: $crate::SpreadLayout,)*
        {
            const FOOTPRINT: u64 = 0 $(+ <$fty as $crate::SpreadLayout>::FOOTPRINT)*;

            fn pull_spread<H: $crate::Host>(
                ptr: &mut $crate::KeyPtr,
                env: &mut $crate::Env<H>,
            ) -> $crate::Result<Self> {
                Ok(Self {
                    $($field: <$fty as $crate::SpreadLayout>::pull_spread(ptr, env)?,)*
                })
            }

            fn push_spread<H: $crate::Host>(
                &mut self,
                ptr: &mut $crate::KeyPtr,
                env: &mut $crate::Env<H>,
            ) -> $crate::Result<()> {
                $($crate::SpreadLayout::push_spread(&mut self.$field, ptr, env)?;)*
                Ok(())
            }

            fn clear_spread<H: $crate::Host>(
                &mut self,
                ptr: &mut $crate::KeyPtr,
                env: &mut $crate::Env<H>,
            ) -> $crate::Result<()> {
                $($crate::SpreadLayout::clear_spread(&mut self.$field, ptr, env)?;)*
                Ok(())
            }
        }

        impl<$($gen),*> $crate::StorageLayout for $ty
        where
            $($fty: $crate::StorageLayout,)*
        {
            fn layout(ptr: &mut $crate::KeyPtr) -> $crate::Layout {
                $crate::Layout::structure(vec![
                    $($crate::FieldLayout::new(
                        stringify!($field),
                        <$fty as $crate::StorageLayout>::layout(ptr),
                    ),)*
                ])
            }
        }
    };
    ($ty:ident { $($field:ident : $fty:ty),* $(,)? }) => {
        $crate::spread_layout!(impl<> $ty { $($field: $fty),* });
    };
}

/// Implements [`PackedLayout`](crate::PackedLayout) for a serde struct by
/// forwarding the hooks to each listed field.
///
/// The plain form also stores the struct packed in one cell when it appears
/// under a spread parent. The `@hooks` form only implements the packed hooks,
/// for structs that are spread on their own and packed through
/// [`Pack`](crate::Pack). Both forms accept `impl<T, ..>` before the type of
/// a generic struct; each type parameter is then required to be
/// `PackedLayout`.
#[macro_export]
macro_rules! packed_layout {
    (@hooks impl<$($gen:ident),* $(,)?> $ty:ty { $($field:ident),* $(,)? }) => {
        impl<$($gen: $crate::PackedLayout),*> $crate::PackedLayout for $ty {
            // Field types are not listed, so assume some field has a hook.
            const REQUIRES_DEEP_CLEAN_UP: bool = true;

            fn pull_packed<H: $crate::Host>(
                &mut self,
                at: &$crate::Key,
                env: &mut $crate::Env<H>,
            ) -> $crate::Result<()> {
                $($crate::PackedLayout::pull_packed(&mut self.$field, at, env)?;)*
                Ok(())
            }

            fn push_packed<H: $crate::Host>(
                &self,
                at: &$crate::Key,
                env: &mut $crate::Env<H>,
            ) -> $crate::Result<()> {
                $($crate::PackedLayout::push_packed(&self.$field, at, env)?;)*
                Ok(())
            }

            fn clear_packed<H: $crate::Host>(
                &self,
                at: &$crate::Key,
                env: &mut $crate::Env<H>,
            ) -> $crate::Result<()> {
                $($crate::PackedLayout::clear_packed(&self.$field, at, env)?;)*
                Ok(())
            }
        }
    };
    (@hooks $ty:ident { $($field:ident),* $(,)? }) => {
        $crate::packed_layout!(@hooks impl<> $ty { $($field),* });
    };
    (impl<$($gen:ident),* $(,)?> $ty:ty { $($field:ident),* $(,)? }) => {
        $crate::packed_layout!(@hooks impl<$($gen),*> $ty { $($field),* });

        impl<$($gen: $crate::PackedLayout),*> $crate::SpreadLayout for $ty {
            $crate::__spread_forwarded_to_packed!();
        }

        impl<$($gen: $crate::PackedLayout),*> $crate::StorageLayout for $ty {
            fn layout(ptr: &mut $crate::KeyPtr) -> $crate::Layout {
                $crate::Layout::cell::<Self>(ptr.advance())
            }
        }
    };
    ($ty:ident { $($field:ident),* $(,)? }) => {
        $crate::packed_layout!(impl<> $ty { $($field),* });
    };
}
