//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Time source abstraction (system and manually driven clocks)
//! - Cryptographic utilities (SHA-256, HMAC, Base64)
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Client identification from request headers
//! - Fixed-window rate limiting infrastructure

pub mod client;
pub mod clock;
pub mod crypto;
pub mod password;
pub mod rate_limit;
