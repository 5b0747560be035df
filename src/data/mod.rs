//! Data module - records, CSV loading and the schema/table manager

mod loader;
mod model;
mod table;

pub use loader::DataLoader;
pub use model::{Record, Schema, Value};
pub use table::{Grid, TableError, TableManager};
