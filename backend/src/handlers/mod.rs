//! HTTP handlers for the Stock Management Platform

pub mod consumption;
pub mod entries;
pub mod exits;
pub mod health;
pub mod import;
pub mod products;
pub mod reports;
pub mod stock_control;

pub use consumption::*;
pub use entries::*;
pub use exits::*;
pub use health::*;
pub use import::*;
pub use products::*;
pub use reports::*;
pub use stock_control::*;
