//! Permalink patterns and the service that maps URLs to them

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

use crate::content::ContentStore;

lazy_static! {
    static ref TOKEN: Regex =
        Regex::new(r":(year|i_month|i_day|month|day|title|name|slug|id|category)").unwrap();
}

/// A permalink template such as `/:slug/` or `/:year/:month/:day/:title/`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermalinkPattern(String);

impl PermalinkPattern {
    /// Normalises the pattern to start with `/`
    pub fn new(pattern: impl AsRef<str>) -> Self {
        Self(format!("/{}", pattern.as_ref().trim_start_matches('/')))
    }

    /// The only pattern pages are reachable through
    pub fn page() -> Self {
        Self::new("/:slug/")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_page(&self) -> bool {
        *self == Self::page()
    }

    /// Compile the pattern into a path matcher
    pub fn matcher(&self) -> PatternMatcher {
        let mut source = String::from("^");
        let mut last = 0;
        for caps in TOKEN.captures_iter(&self.0) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            source.push_str(&regex::escape(&self.0[last..whole.start()]));
            source.push_str(match name.as_str() {
                "year" => r"(?P<year>\d{4})",
                "month" => r"(?P<month>\d{2})",
                "i_month" => r"(?P<month>\d{1,2})",
                "day" => r"(?P<day>\d{2})",
                "i_day" => r"(?P<day>\d{1,2})",
                "id" => r"(?P<id>[^/]+)",
                "category" => r"(?P<category>[^/]+)",
                _ => r"(?P<slug>[^/]+)",
            });
            last = whole.end();
        }
        source.push_str(&regex::escape(&self.0[last..]));
        source.push('$');

        // Escaped literals and fixed groups always form a valid regex, except
        // when a group name repeats (e.g. `:title/:name`)
        let regex = Regex::new(&source).ok();
        if regex.is_none() {
            tracing::warn!("Permalink pattern {} cannot be matched", self.0);
        }
        PatternMatcher { regex }
    }
}

impl fmt::Display for PermalinkPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Values extracted from a path by a [`PatternMatcher`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermalinkParams {
    pub slug: Option<String>,
    pub id: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub category: Option<String>,
}

/// Compiled form of a [`PermalinkPattern`]
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Option<Regex>,
}

impl PatternMatcher {
    pub fn match_path(&self, path: &str) -> Option<PermalinkParams> {
        let caps = self.regex.as_ref()?.captures(path)?;
        let text = |name: &str| caps.name(name).map(|m| m.as_str().to_string());
        let number = |name: &str| caps.name(name).and_then(|m| m.as_str().parse().ok());

        Some(PermalinkParams {
            slug: text("slug"),
            id: text("id"),
            year: number("year").map(|y: u32| y as i32),
            month: number("month"),
            day: number("day"),
            category: text("category"),
        })
    }
}

/// Maps a canonical content path to the permalink pattern that owns it
pub trait PermalinkService: Send + Sync {
    fn pattern_for(&self, canonical_path: &str) -> PermalinkPattern;
}

/// Permalink index over the loaded site content
///
/// Pages own `/:slug/`, posts own the configured post pattern. Paths that
/// belong to no record fall back to the post pattern.
pub struct SitePermalinks {
    default: PermalinkPattern,
    by_path: HashMap<String, PermalinkPattern>,
}

impl SitePermalinks {
    pub fn new(post_pattern: &str, store: &ContentStore) -> Self {
        let default = PermalinkPattern::new(post_pattern);
        let by_path = store
            .iter()
            .map(|record| {
                let pattern = if record.page {
                    PermalinkPattern::page()
                } else {
                    default.clone()
                };
                (record.path.clone(), pattern)
            })
            .collect();

        Self { default, by_path }
    }
}

impl PermalinkService for SitePermalinks {
    fn pattern_for(&self, canonical_path: &str) -> PermalinkPattern {
        self.by_path
            .get(canonical_path)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }
}
