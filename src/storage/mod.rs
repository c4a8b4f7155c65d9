//! Host file access for import/export and snapshot files.

mod file_store;

pub use file_store::{StorageError, read_bytes, read_lines, write_bytes, write_lines};
