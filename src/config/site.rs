//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,
    pub permalink: String,

    // Directory
    pub source_dir: String,

    // Writing
    pub render_drafts: bool,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Extensions
    pub theme: String,
    #[serde(default)]
    pub amp: AmpConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Hexo".to_string(),
            subtitle: String::new(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),
            permalink: ":year/:month/:day/:title/".to_string(),

            source_dir: "source".to_string(),

            render_drafts: false,
            highlight: HighlightConfig::default(),

            theme: "landscape".to_string(),
            amp: AmpConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// AMP rendition settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AmpConfig {
    /// When disabled, AMP URLs redirect to the regular post URL
    pub enable: bool,
    /// Trailing path segment that selects the AMP rendition
    pub marker: String,
    /// Template file looked up in the theme's layout directory
    pub template: String,
}

impl Default for AmpConfig {
    fn default() -> Self {
        Self {
            enable: true,
            marker: "amp".to_string(),
            template: "amp.html".to_string(),
        }
    }
}

/// Highlight configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub line_number: bool,
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            line_number: true,
            theme: "base16-ocean.dark".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Hexo");
        assert_eq!(config.root, "/");
        assert!(config.amp.enable);
        assert_eq!(config.amp.marker, "amp");
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
author: Test User
root: /blog/
permalink: ":title/"
amp:
  enable: false
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.root, "/blog/");
        assert_eq!(config.permalink, ":title/");
        assert!(!config.amp.enable);
        assert_eq!(config.amp.template, "amp.html");
    }

    #[test]
    fn test_unknown_keys_kept_in_extra() {
        let yaml = "title: Blog\ngithub_username: octocat\n";
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.extra.get("github_username").and_then(|v| v.as_str()),
            Some("octocat")
        );
    }
}
