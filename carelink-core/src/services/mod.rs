// File: carelink-core/src/services/mod.rs

pub mod linking_service;

pub use linking_service::{LinkingService, ResolveOutcome};
