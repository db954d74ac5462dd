//! Post model

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A post or standalone page
///
/// Pages share the record shape with posts and are told apart by `page`.
/// Only posts have an AMP rendition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Post title
    pub title: String,

    /// Slug (URL-friendly name)
    pub slug: String,

    /// Publication date
    pub date: DateTime<Local>,

    /// Last updated date
    pub updated: Option<DateTime<Local>>,

    /// Raw markdown content
    pub raw: String,

    /// Rendered HTML content
    pub content: String,

    /// Post excerpt (before <!-- more -->)
    pub excerpt: Option<String>,

    /// Post tags
    pub tags: Vec<String>,

    /// Post categories
    pub categories: Vec<String>,

    /// Layout template to use
    pub layout: String,

    /// Source file path (relative to the source dir)
    pub source: String,

    /// URL path relative to the site root, always ending in `/`
    pub path: String,

    /// Full permalink URL
    pub permalink: String,

    /// Whether this record is a standalone page
    pub page: bool,

    /// Whether the post is published
    pub published: bool,

    /// Post language
    pub lang: Option<String>,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(title: String, date: DateTime<Local>, source: String) -> Self {
        let slug = slug::slugify(&title);
        Self {
            title,
            slug,
            date,
            updated: None,
            raw: String::new(),
            content: String::new(),
            excerpt: None,
            tags: Vec::new(),
            categories: Vec::new(),
            layout: "post".to_string(),
            source,
            path: String::new(),
            permalink: String::new(),
            page: false,
            published: true,
            lang: None,
            extra: HashMap::new(),
        }
    }

    /// Create a new standalone page
    pub fn new_page(title: String, date: DateTime<Local>, source: String) -> Self {
        Self {
            layout: "page".to_string(),
            page: true,
            ..Self::new(title, date, source)
        }
    }
}
