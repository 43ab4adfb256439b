//! Entities

pub mod auth;
pub mod user;
