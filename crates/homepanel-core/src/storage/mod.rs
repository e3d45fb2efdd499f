//! Key-value storage backends
//!
//! `FileStore` persists to a JSON file and survives restarts, `MemoryStore`
//! lives for the process only.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
