//! Typed host environment for tessera.
//!
//! Contracts reach their storage and execution environment through the
//! host. This crate provides:
//! - The raw [`Host`] interface, reporting numeric return codes
//! - [`Env`], a typed wrapper decoding values with the storage codec
//! - Two reference hosts: [`MemoryHost`] and the sled-backed [`SledHost`]
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Storage Layout Engine                    │
//! │      (packed / spread layouts, lazy containers)          │
//! └────────────────────────┬────────────────────────────────┘
//!                          │ Key, typed values
//! ┌────────────────────────▼────────────────────────────────┐
//! │                        Env                               │
//! │  - bincode codec    - return code mapping                │
//! │  - value size limit - properties, events, hashing        │
//! └────────────────────────┬────────────────────────────────┘
//!                          │ key bytes, value bytes, u32 codes
//! ┌────────────────────────▼────────────────────────────────┐
//! │                     Host trait                           │
//! │          MemoryHost  │  SledHost  │  engine bindings     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use tessera_core::Key;
//! use tessera_env::{Env, MemoryHost};
//!
//! let mut env = Env::new(MemoryHost::new());
//! env.set_contract_storage(&Key::zero(), &42u32).unwrap();
//! let value: u32 = env.get_contract_storage(&Key::zero()).unwrap();
//! assert_eq!(value, 42);
//! ```

pub mod codec;
pub mod config;
pub mod context;
pub mod env;
pub mod error;
pub mod event;
pub mod host;
pub mod memory;
pub mod sled_host;

// Re-export commonly used types
pub use config::EnvConfig;
pub use context::CallContext;
pub use env::{Env, StorageResult};
pub use error::{EnvError, Result};
pub use event::{EmittedEvent, Event};
pub use host::{Host, Property};
pub use memory::{HostStats, MemoryHost};
pub use sled_host::SledHost;
