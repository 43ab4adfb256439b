//! Infrastructure Layer

pub mod memory;
pub mod postgres;

pub use memory::MemoryDocumentRepository;
pub use postgres::PgDocumentRepository;
