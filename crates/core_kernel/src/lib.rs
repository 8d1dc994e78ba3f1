//! Core Kernel - Foundational types shared by the claims service
//!
//! This crate provides the building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic and half-up cent rounding
//! - Random, prefixed identifiers for claims and offers
//! - Port error and health types for adapters

pub mod money;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use identifiers::{ClaimId, OfferId};
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
