// Catalog library root
// Loader, query layer and ambient plumbing for the candlestick pattern reference.

pub mod config;
pub mod data;
pub mod diagnostics;
pub mod error;
pub mod services;

pub use error::CatalogError;
pub use services::CandleCatalog;
