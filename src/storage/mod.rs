pub mod export;

pub use export::{export_csv, EXPORT_FILENAME};
