//! CLI command implementations

pub mod demo;
pub mod resolve;

use polystore_core::config::RawConfig;

/// Load raw configuration: properties file if given, then environment overlay
pub fn load_config(path: Option<&str>) -> Result<RawConfig, Box<dyn std::error::Error>> {
    let mut config = match path {
        Some(path) => RawConfig::from_properties_file(path)?,
        None => RawConfig::new(),
    };
    config.overlay_env();
    Ok(config)
}
