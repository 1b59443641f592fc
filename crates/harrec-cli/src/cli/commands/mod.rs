//! CLI command handlers, one per file.

mod convert;
mod summary;

pub use convert::{run_convert, ConvertArgs};
pub use summary::run_summary;
