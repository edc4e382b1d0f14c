//! Business logic services for the Stock Management Platform

pub mod consumption;
pub mod entry;
pub mod exit;
pub mod export;
pub mod import;
pub mod product;
pub mod settings;
pub mod stock_control;

pub use consumption::ConsumptionService;
pub use entry::EntryService;
pub use exit::ExitService;
pub use export::ExportService;
pub use import::ImportService;
pub use product::ProductService;
pub use settings::SettingsService;
pub use stock_control::StockControlService;
