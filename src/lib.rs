//! hexo-amp: AMP renditions for Hexo sites
//!
//! Posts are loaded from the site's markdown sources at startup. A request
//! for `/<post-path>/amp/` is resolved to its post and rendered with the
//! theme's `layout/amp.html`, or with the `views/amp.html` fallback that
//! ships with the installation.

pub mod amp;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod lookup;
pub mod permalink;
pub mod server;
pub mod templates;
pub mod theme;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use error::Error;

/// A site on disk plus the installation serving it
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Source directory
    pub source_dir: PathBuf,
    /// Theme directory
    pub theme_dir: PathBuf,
    /// Installation root, home of the fallback templates
    pub app_root: PathBuf,
}

impl Site {
    /// Open the site in `base_dir`
    pub fn new<P: AsRef<Path>>(base_dir: P, app_root: PathBuf) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };

        let source_dir = base_dir.join(&config.source_dir);
        let theme_dir = base_dir.join("themes").join(&config.theme);

        Ok(Self {
            config,
            base_dir,
            source_dir,
            theme_dir,
            app_root,
        })
    }

    /// Load every post and page
    pub fn load_content(&self) -> Result<content::ContentStore> {
        content::loader::ContentLoader::new(self)?.load()
    }

    /// AMP URL of a record, including the root prefix
    pub fn amp_url(&self, post: &content::Post) -> String {
        helpers::url_for(
            &self.config,
            &format!("{}{}/", post.path, self.config.amp.marker),
        )
    }
}
