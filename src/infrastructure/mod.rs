//! Infrastructure layer: concrete backings and data transfer objects.

pub mod channel;
pub mod dto;
pub mod repository;
