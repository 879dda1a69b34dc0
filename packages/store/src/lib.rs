pub mod kv;

mod file_store;
mod memory;
pub use file_store::FileStore;
pub use memory::MemoryStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod idb;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use idb::IdbStore;

pub use kv::KeyValueStore;
