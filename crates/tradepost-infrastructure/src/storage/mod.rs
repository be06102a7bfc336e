//! `KeyValueStore` implementations and atomic file helpers.

mod atomic;
mod atomic_toml;
mod json_file;
mod memory;

pub use atomic_toml::AtomicTomlFile;
pub use json_file::JsonFileKeyValueStore;
pub use memory::InMemoryKeyValueStore;
