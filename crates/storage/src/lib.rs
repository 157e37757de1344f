//! Storage layout engine for tessera contracts.
//!
//! Contract state is laid out over a flat 256-bit key space, starting from
//! [`Key::zero`]. Two layouts decide where values go:
//! - **Packed**: a whole value is encoded under one key ([`PackedLayout`])
//! - **Spread**: a value's parts get consecutive keys ([`SpreadLayout`]),
//!   so each part can be read and written on its own
//!
//! On top of the layouts sit cached containers that defer host reads until
//! first access and host writes until the value is pushed.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      Containers                          │
//! │      Vector  │  Mapping  │  Lazy  │  Pack                │
//! └────────────────────────┬────────────────────────────────┘
//!                          │
//! ┌────────────────────────▼────────────────────────────────┐
//! │             StorageEntry  /  LazyIndexMap                │
//! │     (Pulled / Updated / Cleared cache, deferred flush)   │
//! └────────────────────────┬────────────────────────────────┘
//!                          │
//! ┌────────────────────────▼────────────────────────────────┐
//! │          Spread engine  ──forward──▶  Packed engine      │
//! │          (KeyPtr walk)                (one key, codec)   │
//! └────────────────────────┬────────────────────────────────┘
//!                          │
//! ┌────────────────────────▼────────────────────────────────┐
//! │                  Env<H: Host>                            │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use tessera_storage::{pull_spread_root, push_spread_root, spread_layout, Key, Vector};
//! use tessera_env::{Env, MemoryHost};
//!
//! struct Counter {
//!     owner: String,
//!     history: Vector<u64>,
//! }
//!
//! spread_layout!(Counter {
//!     owner: String,
//!     history: Vector<u64>,
//! });
//!
//! let mut env = Env::new(MemoryHost::new());
//! let mut counter = Counter {
//!     owner: String::from("alice"),
//!     history: Vector::new(),
//! };
//! counter.history.push(1).unwrap();
//! push_spread_root(&mut counter, &Key::zero(), &mut env).unwrap();
//!
//! let mut loaded: Counter = pull_spread_root(&Key::zero(), &mut env);
//! assert_eq!(loaded.owner, "alice");
//! assert_eq!(*loaded.history.get(0, &mut env).unwrap(), 1);
//! ```

pub mod collections;
pub mod entry;
pub mod error;
pub mod impls;
pub mod layout;
pub mod lazy_index_map;
pub mod macros;
pub mod packed;
pub mod spread;
pub mod traits;

// Re-export commonly used types
pub use collections::{Lazy, Mapping, Pack, Vector};
pub use entry::{EntryState, StorageEntry};
pub use error::{Result, StorageError};
pub use layout::{
    layout_at, ArrayLayout, CellLayout, FieldLayout, HashLayout, HashingStrategy, Layout,
    StorageLayout, StructLayout,
};
pub use lazy_index_map::{LazyIndexMap, INDEX_STRIDE};
pub use packed::{
    clear_packed_root, forward_clear_packed, forward_pull_packed, forward_push_packed,
    pull_packed_root, pull_packed_root_opt, pull_packed_root_result, push_packed_root,
    try_pull_packed_root,
};
pub use spread::{
    clear_spread, clear_spread_root, pull_spread, pull_spread_root, push_spread,
    push_spread_root, try_pull_spread_root,
};
pub use tessera_core::{Key, KeyPtr};
pub use tessera_env::{Env, Host, StorageResult};
pub use traits::{PackedLayout, SpreadLayout};
