//! Package-specific queries.

use crate::channel::SyncChannel;
use crate::error::SyncResult;
use flightdeck_model::{Package, PackageKind};

/// Narrows a package listing by type and author.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageFilter {
    pub kind: Option<PackageKind>,
    pub author: Option<String>,
}

impl PackageFilter {
    pub fn addons() -> Self {
        Self {
            kind: Some(PackageKind::Addon),
            ..Default::default()
        }
    }

    pub fn libraries() -> Self {
        Self {
            kind: Some(PackageKind::Library),
            ..Default::default()
        }
    }

    pub fn by_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Query pairs understood by the packages collection.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(kind) = self.kind {
            query.push(("type".to_string(), kind.code().to_string()));
        }
        if let Some(author) = &self.author {
            query.push(("author".to_string(), author.clone()));
        }
        query
    }
}

impl SyncChannel<Package> {
    pub async fn list_filtered(&self, filter: &PackageFilter) -> SyncResult<Vec<Package>> {
        self.list(&filter.to_query()).await
    }
}
