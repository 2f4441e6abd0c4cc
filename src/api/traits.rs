use async_trait::async_trait;

use crate::error::ApiResult;
use crate::models::Listing;

/// Where listing collections come from.
/// The live backend and a saved snapshot both implement this, so views can
/// be fed from either.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Full marketplace collection
    async fn fetch_listings(&self) -> ApiResult<Vec<Listing>>;

    /// Listings owned by one seller
    async fn fetch_seller_listings(&self, user_id: u64) -> ApiResult<Vec<Listing>>;

    /// A single listing for the detail view
    async fn fetch_listing(&self, id: u64) -> ApiResult<Listing>;

    /// Get the name of the source
    fn source_name(&self) -> &str;
}
