//! Request handlers

pub mod claims;
pub mod health;
pub mod tools;
