//! Domain models for the Stock Management Platform

mod movement;
mod product;
mod settings;

pub use movement::*;
pub use product::*;
pub use settings::*;
