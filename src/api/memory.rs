use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use tracing::info;

use crate::api::traits::ListingSource;
use crate::error::{ApiError, ApiResult};
use crate::models::{Listing, ListingSnapshot};

/// In-memory listing source, typically loaded from a saved snapshot.
#[derive(Debug, Clone)]
pub struct StaticListings {
    name: String,
    listings: Vec<Listing>,
}

impl StaticListings {
    pub fn new(name: impl Into<String>, listings: Vec<Listing>) -> Self {
        Self {
            name: name.into(),
            listings,
        }
    }

    pub fn from_snapshot(snapshot: ListingSnapshot) -> Self {
        Self::new(format!("snapshot of {}", snapshot.source), snapshot.listings)
    }

    /// Read a snapshot file written by `campus-market browse --save`.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let snapshot: ListingSnapshot =
            serde_json::from_str(&json).context("Failed to parse listing snapshot")?;

        info!(
            "Loaded {} listings fetched at {}",
            snapshot.listings.len(),
            snapshot.fetched_at
        );

        Ok(Self::from_snapshot(snapshot))
    }
}

#[async_trait]
impl ListingSource for StaticListings {
    async fn fetch_listings(&self) -> ApiResult<Vec<Listing>> {
        Ok(self.listings.clone())
    }

    async fn fetch_seller_listings(&self, user_id: u64) -> ApiResult<Vec<Listing>> {
        Ok(self
            .listings
            .iter()
            .filter(|l| l.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn fetch_listing(&self, id: u64) -> ApiResult<Listing> {
        self.listings
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
