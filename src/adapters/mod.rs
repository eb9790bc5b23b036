// Adapters layer: concrete storage backends for the grade selection store.

pub mod local;
pub mod memory;

pub use local::LocalStorage;
pub use memory::MemoryStorage;
