//! Infrastructure Layer

pub mod memory;
pub mod sweeper;

pub use memory::MemoryDebounceStore;
pub use sweeper::spawn_sweeper;
