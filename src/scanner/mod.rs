//! Directory listing and filtering

mod filter;
mod pattern;
mod walker;

pub use filter::filter_entries;
pub use pattern::{compile_patterns, FilterSet, Pattern};
pub use walker::{ensure_directory, list_tree, relative_path};
