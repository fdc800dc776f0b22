//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations for the course-access service:
//! - Cryptographic utilities (SHA-256, HMAC, Base64, signed payloads)
//! - PIN secret hashing (Argon2id)
//! - Cookie management
//! - Client identification (IP, bearer credentials)
//! - Rate limiting

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod rate_limit;
pub mod secret;
