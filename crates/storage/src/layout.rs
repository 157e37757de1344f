//! Storage layout metadata.
//!
//! Describes where each part of a spread value lives, for export next to a
//! contract's ABI. [`StorageLayout::layout`] walks the key pointer exactly as
//! [`crate::SpreadLayout::push_spread`] does, so every key the runtime writes
//! for a value appears in (or is derived from) its exported layout.

use serde::{Serialize, Serializer};
use tessera_core::{Key, KeyPtr};

fn serialize_key<S: Serializer>(key: &Key, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(key)
}

/// Layout of a storable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Layout {
    /// One encoded value under one key.
    Cell(CellLayout),
    /// Cells addressed by hashing a prefix with the encoded lookup key.
    Hash(HashLayout),
    /// Cells at a fixed stride from an offset key.
    Array(ArrayLayout),
    /// Named parts, in storage order.
    Struct(StructLayout),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellLayout {
    #[serde(serialize_with = "serialize_key")]
    pub key: Key,
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HashLayout {
    #[serde(serialize_with = "serialize_key")]
    pub offset: Key,
    pub strategy: HashingStrategy,
    pub layout: Box<Layout>,
}

/// How a hashed cell key is computed: `hasher(prefix ++ encode(key) ++ postfix)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HashingStrategy {
    pub hasher: String,
    pub prefix: String,
    pub postfix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayLayout {
    #[serde(serialize_with = "serialize_key")]
    pub offset: Key,
    /// Maximum number of elements.
    pub len: u32,
    /// Key distance between consecutive elements.
    pub cells_per_elem: u64,
    pub layout: Box<Layout>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructLayout {
    pub fields: Vec<FieldLayout>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldLayout {
    pub name: String,
    pub layout: Layout,
}

impl FieldLayout {
    pub fn new(name: impl Into<String>, layout: Layout) -> Self {
        Self {
            name: name.into(),
            layout,
        }
    }
}

impl Layout {
    /// A cell holding a `T` at `key`.
    pub fn cell<T: ?Sized>(key: Key) -> Self {
        Layout::Cell(CellLayout {
            key,
            ty: std::any::type_name::<T>().to_string(),
        })
    }

    /// A struct layout from its fields.
    pub fn structure(fields: Vec<FieldLayout>) -> Self {
        Layout::Struct(StructLayout { fields })
    }

    /// Keys of every fixed cell, in storage order.
    ///
    /// Array and hash cells depend on runtime indices and are not listed.
    pub fn cell_keys(&self) -> Vec<Key> {
        let mut keys = Vec::new();
        self.collect_cell_keys(&mut keys);
        keys
    }

    fn collect_cell_keys(&self, keys: &mut Vec<Key>) {
        match self {
            Layout::Cell(cell) => keys.push(cell.key),
            Layout::Struct(layout) => {
                for field in &layout.fields {
                    field.layout.collect_cell_keys(keys);
                }
            }
            Layout::Hash(_) | Layout::Array(_) => {}
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// A type that can describe its own spread layout.
pub trait StorageLayout {
    /// Describe the layout starting at the next key of `ptr`.
    fn layout(ptr: &mut KeyPtr) -> Layout;
}

/// The layout of a value rooted at `root`.
pub fn layout_at<T: StorageLayout>(root: &Key) -> Layout {
    let mut ptr = KeyPtr::new(*root);
    T::layout(&mut ptr)
}
