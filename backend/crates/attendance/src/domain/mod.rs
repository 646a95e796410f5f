//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Session, CheckIn)
//! - Domain value objects (Coordinate, BoundaryRadius, AttendanceStatus, Identity)
//! - Geodesic distance and the geofence classifier
//! - Repository traits (interfaces)

pub mod entities;
pub mod geo;
pub mod repository;
pub mod services;
pub mod value_objects;
