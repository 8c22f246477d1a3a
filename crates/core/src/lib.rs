//! Core business logic for Leasehold.
//!
//! This crate contains pure billing logic with ZERO web or database dependencies.
//! Persistence is reached through the `billing::store` traits, implemented by the
//! db crate.
//!
//! # Modules
//!
//! - `billing` - Meter usage calculation, statement assembly, proration and settlement

pub mod billing;
