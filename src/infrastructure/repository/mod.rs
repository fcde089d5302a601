//! Storage port implementations.
//!
//! The domain layer defines the repository traits; this module provides the
//! concrete backings. The UseCase layer depends on the traits only
//! (dependency inversion).

pub mod inmemory;

pub use inmemory::InMemoryStore;
