//! User-facing storage containers.

pub mod lazy;
pub mod mapping;
pub mod pack;
pub mod vector;

pub use lazy::Lazy;
pub use mapping::Mapping;
pub use pack::Pack;
pub use vector::Vector;
