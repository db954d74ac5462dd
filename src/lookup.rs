//! Content lookup: from a canonical path and permalink pattern to a record

use async_trait::async_trait;
use chrono::Datelike;
use std::sync::Arc;

use crate::content::{ContentStore, Post};
use crate::error::Error;
use crate::permalink::{PermalinkParams, PermalinkPattern};

/// Options passed along with a lookup
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupOptions {
    pub permalinks: PermalinkPattern,
}

/// A resolved record
#[derive(Debug, Clone, PartialEq)]
pub struct LookupResult {
    pub post: Post,
}

/// Resolves a content record for a path, may suspend on I/O
#[async_trait]
pub trait ContentLookupService: Send + Sync {
    async fn lookup(&self, canonical_path: &str, options: &LookupOptions)
        -> Result<LookupResult, Error>;
}

/// Lookup over the in-memory [`ContentStore`]
pub struct PostLookup {
    store: Arc<ContentStore>,
}

impl PostLookup {
    pub fn new(store: Arc<ContentStore>) -> Self {
        Self { store }
    }

    fn find(&self, canonical_path: &str, params: &PermalinkParams) -> Option<&Post> {
        let key = params.slug.as_deref().or(params.id.as_deref())?;
        let candidates = self.store.find_by_slug(key);

        candidates
            .iter()
            .find(|p| p.path == canonical_path)
            .or_else(|| candidates.first())
            .copied()
    }
}

#[async_trait]
impl ContentLookupService for PostLookup {
    async fn lookup(
        &self,
        canonical_path: &str,
        options: &LookupOptions,
    ) -> Result<LookupResult, Error> {
        let params = options
            .permalinks
            .matcher()
            .match_path(canonical_path)
            .ok_or_else(|| {
                Error::not_found(format!(
                    "{} does not match permalink {}",
                    canonical_path, options.permalinks
                ))
            })?;

        let post = self
            .find(canonical_path, &params)
            .filter(|p| p.published)
            .ok_or_else(|| Error::not_found(format!("No post at {}", canonical_path)))?;

        if !date_matches(post, &params) {
            return Err(Error::not_found(format!(
                "Date in {} does not match {}",
                canonical_path, post.source
            )));
        }

        if post.page && !options.permalinks.is_page() {
            return Err(Error::not_found(format!(
                "Page {} is only reachable through {}",
                post.source,
                PermalinkPattern::page()
            )));
        }

        tracing::debug!("Resolved {} to {}", canonical_path, post.source);
        Ok(LookupResult { post: post.clone() })
    }
}

fn date_matches(post: &Post, params: &PermalinkParams) -> bool {
    let date = post.date;
    params.year.map_or(true, |y| y == date.year())
        && params.month.map_or(true, |m| m == date.month())
        && params.day.map_or(true, |d| d == date.day())
}
