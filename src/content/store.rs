//! In-memory content store, built once at startup

use std::collections::HashMap;

use super::Post;

/// Posts and pages indexed by slug
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    records: Vec<Post>,
    by_slug: HashMap<String, Vec<usize>>,
}

impl ContentStore {
    pub fn new(records: Vec<Post>) -> Self {
        let mut by_slug: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, record) in records.iter().enumerate() {
            by_slug.entry(record.slug.clone()).or_default().push(idx);
        }
        Self { records, by_slug }
    }

    /// All records sharing a slug, in load order
    pub fn find_by_slug(&self, slug: &str) -> Vec<&Post> {
        self.by_slug
            .get(slug)
            .map(|ids| ids.iter().map(|&i| &self.records[i]).collect())
            .unwrap_or_default()
    }

    pub fn posts(&self) -> impl Iterator<Item = &Post> {
        self.records.iter().filter(|r| !r.page)
    }

    pub fn pages(&self) -> impl Iterator<Item = &Post> {
        self.records.iter().filter(|r| r.page)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Post> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
