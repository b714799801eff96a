//! Storage effect handlers
//!
//! Implementations of `StorageEffects` from `recovery-core`.

pub mod filesystem;
pub mod memory;

pub use filesystem::FilesystemStorageHandler;
pub use memory::MemoryStorageHandler;
