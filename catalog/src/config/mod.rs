// Catalog configuration
pub mod settings;
