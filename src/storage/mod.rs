pub mod db;
pub mod indexes;
pub mod models;
mod tables;
mod tasks;

pub use db::{Database, DatabaseError};
pub use indexes::{EnsureReport, INDEX_SPECS};
pub use tables::*;
