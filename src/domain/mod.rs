//! Domain layer
//!
//! Entities and value objects carry the data model, policies hold the
//! pure lending rules, ports define the seams infrastructure plugs into,
//! and services drive the lifecycle across those seams.

pub mod entities;
pub mod policies;
pub mod ports;
pub mod services;
pub mod value_objects;
