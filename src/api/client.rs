use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::traits::ListingSource;
use crate::api::types::{
    Envelope, FeedbackSubmission, NewListing, RatingStatus, RatingSubmission, StockUpdate,
};
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::Listing;
use crate::session::SessionContext;

/// HTTP client for the campus marketplace backend
pub struct MarketplaceClient {
    client: Client,
    base_url: String,
}

impl MarketplaceClient {
    /// Create a client against the default local backend
    pub fn new() -> ApiResult<Self> {
        Self::with_config(&ApiConfig::default())
    }

    /// Create a client with custom connection settings
    pub fn with_config(config: &ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("campus-market/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request that needs a signed-in user.
    fn authorized(
        &self,
        method: Method,
        path: &str,
        session: &SessionContext,
    ) -> ApiResult<RequestBuilder> {
        let token = session.bearer().ok_or(ApiError::NotLoggedIn)?;
        Ok(self.client.request(method, self.url(path)).bearer_auth(token))
    }

    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Backend returned status: {}", status);
            return Err(ApiError::from_status(status, &body));
        }

        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let body = self.send(request).await?.text().await?;
        debug!("Downloaded {} bytes of JSON", body.len());
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        session: &SessionContext,
        body: &B,
    ) -> ApiResult<()> {
        let request = self.authorized(method, path, session)?.json(body);
        self.send(request).await?;
        Ok(())
    }

    async fn get_collection(&self, path: &str) -> ApiResult<Vec<Listing>> {
        debug!("Fetching {}", path);
        let envelope: Envelope<Listing> = self.read_json(self.client.get(self.url(path))).await?;
        Ok(envelope.data)
    }

    /// Ask whether the signed-in user already rated this listing.
    pub async fn rating_status(
        &self,
        session: &SessionContext,
        listing_id: u64,
    ) -> ApiResult<RatingStatus> {
        let path = format!("/api/listings/{}/rating-status", listing_id);
        self.read_json(self.authorized(Method::GET, &path, session)?)
            .await
    }

    pub async fn submit_rating(
        &self,
        session: &SessionContext,
        listing_id: u64,
        rating: &RatingSubmission,
    ) -> ApiResult<()> {
        rating.validate()?;
        if !session.can_rate() {
            return Err(ApiError::NotLoggedIn);
        }

        let path = format!("/api/listings/{}/rating", listing_id);
        self.send_json(Method::POST, &path, session, rating).await?;
        info!("Rated listing {} with {} stars", listing_id, rating.rating);
        Ok(())
    }

    pub async fn submit_feedback(
        &self,
        session: &SessionContext,
        feedback: FeedbackSubmission,
    ) -> ApiResult<()> {
        let feedback = feedback.prepare()?;
        self.send_json(Method::POST, "/api/feedback", session, &feedback)
            .await?;
        info!("Feedback submitted");
        Ok(())
    }

    /// Post a new listing; the backend queues it for admin approval.
    pub async fn create_listing(
        &self,
        session: &SessionContext,
        draft: NewListing,
    ) -> ApiResult<()> {
        let listing = draft.prepare()?;
        self.send_json(Method::POST, "/api/listings", session, &listing)
            .await?;
        info!("Listing '{}' submitted for approval", listing.title);
        Ok(())
    }

    pub async fn update_stock(
        &self,
        session: &SessionContext,
        listing_id: u64,
        new_stock: i64,
    ) -> ApiResult<()> {
        let update = StockUpdate::new(new_stock)?;
        let path = format!("/api/listings/{}", listing_id);
        self.send_json(Method::PATCH, &path, session, &update).await?;
        info!("Stock for listing {} set to {}", listing_id, update.stock_quantity);
        Ok(())
    }

    /// Delete a listing. Only its owner or an admin may do this.
    pub async fn delete_listing(&self, session: &SessionContext, listing: &Listing) -> ApiResult<()> {
        if !session.is_authenticated() {
            return Err(ApiError::NotLoggedIn);
        }
        if !session.can_delete(listing) {
            return Err(ApiError::Forbidden);
        }

        let path = format!("/api/listings/{}", listing.id);
        self.send(self.authorized(Method::DELETE, &path, session)?)
            .await?;
        info!("Deleted listing {}", listing.id);
        Ok(())
    }
}

#[async_trait]
impl ListingSource for MarketplaceClient {
    async fn fetch_listings(&self) -> ApiResult<Vec<Listing>> {
        let listings = self.get_collection("/api/listings").await?;
        info!("Fetched {} listings", listings.len());
        Ok(listings)
    }

    async fn fetch_seller_listings(&self, user_id: u64) -> ApiResult<Vec<Listing>> {
        let listings = self
            .get_collection(&format!("/api/listings/user/{}", user_id))
            .await?;
        info!("Fetched {} listings for seller {}", listings.len(), user_id);
        Ok(listings)
    }

    async fn fetch_listing(&self, id: u64) -> ApiResult<Listing> {
        let path = format!("/api/listings/{}", id);
        debug!("Fetching {}", path);
        self.read_json(self.client.get(self.url(&path))).await
    }

    fn source_name(&self) -> &str {
        &self.base_url
    }
}
