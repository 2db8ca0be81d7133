//! Service layer for the resource API.
//! - `resources`: the `Resource` domain type and the `ResourceStore` seam the HTTP layer depends on.
//! - `storage`: reusable in-memory map storage behind an async lock.
//! - `errors`: the service error type surfaced to callers.

pub mod errors;
pub mod resources;
pub mod storage;
