//! Shared types and domain logic for the Stock Management Platform
//!
//! This crate contains the record types and the pure calculators (derived
//! stock, consumption forecast, invoice name matching) used by the backend.

pub mod consumption;
pub mod matching;
pub mod models;
pub mod stock;
pub mod validation;

pub use consumption::*;
pub use matching::*;
pub use models::*;
pub use stock::*;
pub use validation::*;
