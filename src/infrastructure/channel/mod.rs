//! Channel layer implementations.

pub mod inmemory;

pub use inmemory::InMemoryChannelLayer;
