//! Backends for the persisted conversion history.

pub mod disk;
pub mod memory;

pub use disk::DiskStore;
pub use memory::MemoryStore;
