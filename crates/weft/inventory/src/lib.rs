//! Device inventory: the normalized registry and the sources that fill it.
//!
//! Sources refresh the store once per runner cycle; the store is read-only
//! for the rest of that cycle. Raw source schemas (NetBox payloads, file
//! layouts) never leak past this crate.

pub mod error;
pub mod source;
pub mod store;

pub use error::{InventoryError, Result};
pub use source::{GitInventorySource, InventorySource, NetBoxInventorySource, StaticInventorySource};
pub use store::InventoryStore;
