//! Shared types, errors, and configuration for Leasehold.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management, including billing policies
//! - JWT claims and bearer token validation

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;


pub use auth::{Claims, Role};
pub use config::{AppConfig, BillingConfig, ChargePolicy, ReopenPolicy, TotalPolicy};
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
