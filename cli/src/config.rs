use anyhow::Context;
use std::fs;
use std::path::Path;
use tilesweep_core::ProgressionConfig;

/// Reads the progression tables from a TOML file, or the built-in defaults without one.
pub fn load(path: Option<&Path>) -> anyhow::Result<ProgressionConfig> {
    let Some(path) = path else {
        return Ok(Default::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read config file {}", path.display()))?;
    parse(&text).with_context(|| format!("Invalid config file {}", path.display()))
}

pub fn parse(text: &str) -> anyhow::Result<ProgressionConfig> {
    let config: ProgressionConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}
