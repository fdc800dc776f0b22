//! Infrastructure Layer
//!
//! Progress is kept in process memory only.

pub mod memory;

pub use memory::InMemoryProgressRepository;
