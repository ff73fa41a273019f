//! Project layout configuration.
//!
//! The built-in layout matches the error analysis repository. A `.json` or
//! `.toml` layout file can override individual paths for forks that moved
//! the widget or visualization sources around.

pub mod loader;

use crate::error::ConfigError;
use crate::models::ProjectLayout;
use std::path::Path;

pub use loader::{load_layout_from_file, parse_layout, LayoutFormat};

/// Resolve the layout for this run: the file at `path` when given, the
/// built-in defaults otherwise.
pub fn resolve_layout(path: Option<&Path>) -> Result<ProjectLayout, ConfigError> {
    match path {
        Some(path) => load_layout_from_file(path),
        None => Ok(ProjectLayout::default()),
    }
}
