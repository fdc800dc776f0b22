//! Shared Kernel - Domain-crossing minimal core
//!
//! Vocabulary shared by the access, learning and admin crates:
//! - The unified error type and result alias
//! - Typed ID wrappers
//!
//! Only things whose meaning is identical in every domain belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
