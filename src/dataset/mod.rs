pub mod cache;
pub mod loader;
pub mod types;

pub use cache::{ContentKey, DatasetCache};
pub use loader::{load_csv, SchemaError};
pub use types::{Comment, Dataset};
