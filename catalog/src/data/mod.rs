// Catalog file input and output
pub mod export;
pub mod loader;
