// Query services consumed by the presentation layer
pub mod catalog_service;

pub use catalog_service::CandleCatalog;
