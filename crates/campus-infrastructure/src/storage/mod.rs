//! Persistence backends for the key/value store.

pub mod atomic_json;
pub mod local_storage;
pub mod memory;

pub use atomic_json::AtomicJsonFile;
pub use local_storage::FileLocalStorage;
pub use memory::MemoryLocalStorage;
