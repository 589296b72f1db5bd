//! Session storage adapters.

mod file_storage;
mod keyring_storage;
mod memory_storage;

pub use file_storage::FileSessionStorage;
pub use keyring_storage::KeyringSessionStorage;
pub use memory_storage::MemorySessionStorage;
