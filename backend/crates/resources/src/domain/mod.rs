//! Domain Layer
//!
//! Contains the resource types, the [`resource::Resource`] trait that binds
//! them to the document store, and the repository trait.

pub mod entities;
pub mod repository;
pub mod resource;
pub mod value_objects;
