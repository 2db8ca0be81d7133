//! Storage abstractions for service layer
//!
//! Contains reusable in-memory stores shared by the domain stores.

pub mod memory_map_store;
