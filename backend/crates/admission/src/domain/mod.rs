//! Domain Layer - Admission rules
//!
//! This layer contains:
//! - Domain entities (DebounceEntry)
//! - Domain value objects (Fingerprint, Access, RoutePolicy)
//! - Domain services (body canonicalization)
//! - Repository traits (DebounceStore)

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
