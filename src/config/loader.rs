//! Layout file loader and validation.

use crate::error::ConfigError;
use crate::models::ProjectLayout;
use std::fs;
use std::path::Path;

/// Supported layout file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutFormat {
    Json,
    Toml,
}

/// Load a project layout from a `.json` or `.toml` file.
///
/// Fields missing from the file keep their default values.
pub fn load_layout_from_file(path: &Path) -> Result<ProjectLayout, ConfigError> {
    let format = validate_layout_path(path)?;

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(format!(
                "Layout file not found at: {}",
                path.display()
            ))
        } else {
            ConfigError::IoError(e)
        }
    })?;

    let layout = parse_layout(&content, format)?;
    validate_layout(&layout)?;

    log::debug!("[Config] Loaded layout from {}", path.display());
    Ok(layout)
}

/// Parse layout content in the given format.
pub fn parse_layout(content: &str, format: LayoutFormat) -> Result<ProjectLayout, ConfigError> {
    let layout = match format {
        LayoutFormat::Json => serde_json::from_str(content)?,
        LayoutFormat::Toml => toml::from_str(content)?,
    };
    Ok(layout)
}

/// Validate a layout path and derive its format from the extension.
pub fn validate_layout_path(path: &Path) -> Result<LayoutFormat, ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationFailed(
            "Layout path cannot be empty".to_string(),
        ));
    }

    match path.extension() {
        Some(ext) if ext == "json" => Ok(LayoutFormat::Json),
        Some(ext) if ext == "toml" => Ok(LayoutFormat::Toml),
        Some(ext) => Err(ConfigError::ValidationFailed(format!(
            "Layout file must have .json or .toml extension, got .{}",
            ext.to_string_lossy()
        ))),
        None => Err(ConfigError::ValidationFailed(
            "Layout file must have .json or .toml extension".to_string(),
        )),
    }
}

/// Reject layouts that would make the build touch the project root itself.
pub fn validate_layout(layout: &ProjectLayout) -> Result<(), ConfigError> {
    if layout.root_marker.trim().is_empty() {
        return Err(ConfigError::ValidationFailed(
            "root_marker cannot be empty".to_string(),
        ));
    }

    let dirs = [
        ("widget_js_dir", &layout.widget_js_dir),
        ("vis_dir", &layout.vis_dir),
        ("vis_build_output", &layout.vis_build_output),
        ("vendored_vis_path", &layout.vendored_vis_path),
    ];
    for (name, dir) in dirs.iter().copied().chain(
        layout
            .cleanup_dirs
            .iter()
            .map(|dir| ("cleanup_dirs", dir)),
    ) {
        if dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(format!(
                "{} cannot be empty",
                name
            )));
        }
        if dir.is_absolute() {
            return Err(ConfigError::ValidationFailed(format!(
                "{} must be relative to the project root, got {}",
                name,
                dir.display()
            )));
        }
    }

    if layout.generated_files.iter().any(|f| f.trim().is_empty()) {
        return Err(ConfigError::ValidationFailed(
            "generated_files cannot contain empty entries".to_string(),
        ));
    }

    Ok(())
}
