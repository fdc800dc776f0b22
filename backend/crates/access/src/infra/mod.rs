//! Infrastructure Layer
//!
//! PostgreSQL and in-memory repository implementations.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryAccessRepository;
pub use postgres::PgAccessRepository;
