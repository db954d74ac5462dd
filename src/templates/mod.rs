//! Tera-backed view renderer for AMP templates
//!
//! Templates are plain Tera files read from disk on every render, so theme
//! edits show up without a restart. Output is HTML-escaped; post HTML is
//! written with `{{ post.content | amp_content | safe }}`.

mod filters;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tera::{Context, Tera};

use crate::amp::ViewRenderer;
use crate::config::SiteConfig;
use crate::error::Error;

const TEMPLATE_NAME: &str = "amp.html";

/// Site-wide values exposed to templates as `config`
#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,
    pub root: String,
}

impl From<&SiteConfig> for ConfigData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            url: config.url.clone(),
            root: config.root.clone(),
        }
    }
}

/// Renders template files with the site and theme configuration in scope
pub struct TemplateRenderer {
    config: ConfigData,
    theme: IndexMap<String, serde_yaml::Value>,
}

impl TemplateRenderer {
    pub fn new(config: &SiteConfig, theme: IndexMap<String, serde_yaml::Value>) -> Self {
        Self {
            config: ConfigData::from(config),
            theme,
        }
    }

    fn engine(source: &str) -> Result<Tera, Error> {
        let mut tera = Tera::default();

        // Registered under an `.html` name so Tera autoescapes every value
        tera.add_raw_template(TEMPLATE_NAME, source)?;
        tera.register_filter("strip_html", filters::strip_html);
        tera.register_filter("truncate_chars", filters::truncate_chars);
        tera.register_filter("date_format", filters::date_format);
        tera.register_filter("amp_content", filters::amp_content);
        tera.register_filter("json_script", filters::json_script);
        Ok(tera)
    }
}

impl ViewRenderer for TemplateRenderer {
    fn render(&self, template: &Path, data: &Map<String, Value>) -> Result<String, Error> {
        let source = fs::read_to_string(template)?;
        let tera = Self::engine(&source)?;

        let mut context = Context::from_value(Value::Object(data.clone()))?;
        context.insert("config", &self.config);
        context.insert("theme", &self.theme);

        Ok(tera.render(TEMPLATE_NAME, &context)?)
    }
}
