//! Infrastructure Layer - Adapters for the record store and identity provider

pub mod identity;
pub mod memory;
pub mod postgres;
