//! Resolve the post behind an AMP request

use std::sync::Arc;

use super::path::{canonical_path, relative_path};
use super::AmpRequest;
use crate::error::Error;
use crate::lookup::{ContentLookupService, LookupOptions};
use crate::permalink::PermalinkService;

pub struct ContentResolver {
    permalinks: Arc<dyn PermalinkService>,
    lookup: Arc<dyn ContentLookupService>,
    root: String,
    marker: String,
}

impl ContentResolver {
    pub fn new(
        permalinks: Arc<dyn PermalinkService>,
        lookup: Arc<dyn ContentLookupService>,
        root: impl Into<String>,
        marker: impl Into<String>,
    ) -> Self {
        Self {
            permalinks,
            lookup,
            root: root.into(),
            marker: marker.into(),
        }
    }

    /// Attach the post addressed by `request` to it
    ///
    /// Lookup failures are returned as-is and leave `request.content` unset.
    pub async fn resolve(&self, request: &mut AmpRequest) -> Result<(), Error> {
        let relative = relative_path(
            &request.original_path,
            request.relative_path.as_deref(),
            &self.root,
        );
        let canonical = canonical_path(&relative, &self.marker).ok_or_else(|| {
            Error::not_found(format!("{} is not an AMP URL", request.original_path))
        })?;

        let permalinks = self.permalinks.pattern_for(&canonical);
        tracing::debug!("Looking up {} with permalink {}", canonical, permalinks);

        let result = self
            .lookup
            .lookup(&canonical, &LookupOptions { permalinks })
            .await?;

        request.content = Some(result.post);
        Ok(())
    }
}
