//! Theme loader - reads theme configuration and locates layout files

use anyhow::Result;
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};

/// The active theme
pub struct ThemeLoader {
    /// Theme directory path
    theme_dir: PathBuf,
    /// Theme configuration (IndexMap preserves YAML key order)
    config: IndexMap<String, serde_yaml::Value>,
}

impl ThemeLoader {
    /// Load a theme from a directory
    ///
    /// A missing directory is not an error: the site then renders with the
    /// built-in templates only.
    pub fn load<P: AsRef<Path>>(theme_dir: P) -> Result<Self> {
        let theme_dir = theme_dir.as_ref().to_path_buf();
        let mut loader = Self {
            theme_dir,
            config: IndexMap::new(),
        };

        if !loader.theme_dir.exists() {
            tracing::warn!(
                "Theme directory not found: {:?}, using built-in templates",
                loader.theme_dir
            );
            return Ok(loader);
        }

        let config_path = loader.theme_dir.join("_config.yml");
        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            loader.config = serde_yaml::from_str(&content)?;
            tracing::debug!("Loaded theme config from {:?}", config_path);
        }

        Ok(loader)
    }

    /// Get theme configuration
    pub fn config(&self) -> &IndexMap<String, serde_yaml::Value> {
        &self.config
    }

    /// Path of a layout file the theme supplies, if any
    pub fn template(&self, name: &str) -> Option<PathBuf> {
        let path = self.theme_dir.join("layout").join(name);
        path.is_file().then_some(path)
    }

    /// Static assets shipped with the theme
    pub fn source_dir(&self) -> Option<PathBuf> {
        let dir = self.theme_dir.join("source");
        dir.is_dir().then_some(dir)
    }
}
