//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no domain meaning:
//! - Cryptographic utilities (HMAC-SHA256, Base64, random bytes)
//! - Request credential extraction (`Authorization: Bearer`)

pub mod client;
pub mod crypto;
