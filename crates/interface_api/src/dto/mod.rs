//! Data transfer objects

pub mod claims;
pub mod tools;
