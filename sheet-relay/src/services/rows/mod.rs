// Row engine for appending to and conditionally updating a sheet
//
// Works purely against the `GridAccessor` trait; the Google client is only
// one implementation of it.

pub mod accessor;
pub mod append;
pub mod matcher;
pub mod merge;
pub mod models;
pub mod update;

#[cfg(test)]
pub mod memory;

// Re-export commonly used types
pub use accessor::{AccessorProvider, GridAccessor};
pub use append::append_rows;
pub use models::{AppendRequest, UpdateRequest};
pub use update::{UpdateOptions, UpdateOutcome, process_updates};
