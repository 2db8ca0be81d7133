//! Resource records and the store that owns them.

pub mod domain;
pub mod store;

pub use domain::{Resource, ResourceInput};
pub use store::{InMemoryResourceStore, ResourceStore};
