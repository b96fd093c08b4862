mod database;
mod databases;
mod keyval;

pub use database::{Database, Handle};
pub use databases::Databases;
pub use keyval::{KeyValCount, KeyValue, count_keyvals};
