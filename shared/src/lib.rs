// Data model and display helpers shared by the catalog library and its front ends.
pub mod models;
pub mod utils;
