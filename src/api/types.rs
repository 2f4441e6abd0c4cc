use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::models::coerce::{de_opt_stars, de_seq};
use crate::models::{non_blank, Category, Condition, Variant};

/// Collection responses come wrapped as `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct Envelope<T> {
    #[serde(default, deserialize_with = "de_seq")]
    pub data: Vec<T>,
}

fn validate_stars(rating: u8) -> ApiResult<()> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(ApiError::validation("Please select a rating"))
    }
}

/// A buyer's star rating for a listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSubmission {
    pub rating: u8,
    pub comment: String,
}

impl RatingSubmission {
    pub fn new(rating: u8, comment: impl Into<String>) -> Self {
        Self {
            rating,
            comment: comment.into(),
        }
    }

    pub fn validate(&self) -> ApiResult<()> {
        validate_stars(self.rating)
    }
}

/// Whether the signed-in user already rated a listing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RatingStatus {
    #[serde(rename = "hasRated", default)]
    pub has_rated: bool,
    #[serde(rename = "previousRating", default, deserialize_with = "de_opt_stars")]
    pub previous_rating: Option<u8>,
}

/// Site feedback from the feedback page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackSubmission {
    pub rating: u8,
    pub comment: String,
}

impl FeedbackSubmission {
    pub fn new(rating: u8, comment: impl Into<String>) -> Self {
        Self {
            rating,
            comment: comment.into(),
        }
    }

    /// Checks the rating and trims the comment.
    pub fn prepare(self) -> ApiResult<Self> {
        validate_stars(self.rating)?;
        Ok(Self {
            rating: self.rating,
            comment: self.comment.trim().to_string(),
        })
    }
}

/// Payload for posting a new listing. Images must already be hosted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub condition: Condition,
    pub category: Category,
    pub whatsapp_phone: String,
    pub stock_quantity: u32,
    pub image_urls: Vec<String>,
    pub variants: Vec<Variant>,
}

impl Default for NewListing {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            price: 0.0,
            condition: Condition::UsedGood,
            category: Category::Other,
            whatsapp_phone: String::new(),
            stock_quantity: 1,
            image_urls: Vec::new(),
            variants: Vec::new(),
        }
    }
}

impl NewListing {
    /// Validate the draft and drop variants that carry neither color nor size.
    pub fn prepare(mut self) -> ApiResult<Self> {
        if self.title.trim().is_empty() {
            return Err(ApiError::validation("Title is required"));
        }

        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(ApiError::validation("Valid price is required"));
        }

        let supplied = self.variants.len();
        self.variants.retain(|v| {
            non_blank(v.color.as_deref()).is_some() || non_blank(v.size.as_deref()).is_some()
        });
        if supplied > 0 && self.variants.is_empty() {
            return Err(ApiError::validation(
                "Please fill at least color or size for each variant, or remove empty ones",
            ));
        }

        if self.stock_quantity == 0 {
            self.stock_quantity = 1;
        }

        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StockUpdate {
    pub stock_quantity: u32,
}

impl StockUpdate {
    pub fn new(stock_quantity: i64) -> ApiResult<Self> {
        if stock_quantity < 0 {
            return Err(ApiError::validation("Stock quantity cannot be negative"));
        }

        let stock_quantity = u32::try_from(stock_quantity)
            .map_err(|_| ApiError::validation("Stock quantity is too large"))?;
        Ok(Self { stock_quantity })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Listing;
    use serde_json::json;

    #[test]
    fn envelope_tolerates_missing_data() {
        let env: Envelope<Listing> = serde_json::from_value(json!({})).unwrap();
        assert!(env.data.is_empty());

        let env: Envelope<Listing> = serde_json::from_value(json!({"data": null})).unwrap();
        assert!(env.data.is_empty());

        let env: Envelope<Listing> =
            serde_json::from_value(json!({"data": [{"id": 1, "title": "Desk"}]})).unwrap();
        assert_eq!(env.data.len(), 1);
    }

    #[test]
    fn ratings_must_be_one_to_five() {
        assert!(RatingSubmission::new(0, "").validate().is_err());
        assert!(RatingSubmission::new(6, "").validate().is_err());
        assert!(RatingSubmission::new(5, "great").validate().is_ok());
    }

    #[test]
    fn feedback_comment_is_trimmed() {
        let prepared = FeedbackSubmission::new(4, "  love it \n").prepare().unwrap();
        assert_eq!(prepared.comment, "love it");
    }

    #[test]
    fn rating_status_decodes_camel_case() {
        let status: RatingStatus =
            serde_json::from_value(json!({"hasRated": true, "previousRating": 4})).unwrap();
        assert!(status.has_rated);
        assert_eq!(status.previous_rating, Some(4));
    }

    #[test]
    fn rating_status_tolerates_loose_previous_rating() {
        let status: RatingStatus =
            serde_json::from_value(json!({"hasRated": true, "previousRating": "4.0"})).unwrap();
        assert_eq!(status.previous_rating, Some(4));

        let status: RatingStatus =
            serde_json::from_value(json!({"hasRated": true, "previousRating": 3.5})).unwrap();
        assert_eq!(status.previous_rating, Some(3));

        let status: RatingStatus = serde_json::from_value(json!({"hasRated": false})).unwrap();
        assert_eq!(status.previous_rating, None);
    }

    #[test]
    fn new_listing_validation() {
        let missing_title = NewListing {
            price: 10.0,
            ..Default::default()
        };
        assert_eq!(
            missing_title.prepare().unwrap_err().to_string(),
            "Title is required"
        );

        let free = NewListing {
            title: "Pens".into(),
            ..Default::default()
        };
        assert_eq!(free.prepare().unwrap_err().to_string(), "Valid price is required");
    }

    #[test]
    fn new_listing_drops_blank_variants() {
        let draft = NewListing {
            title: "Scrubs".into(),
            price: 250.0,
            stock_quantity: 0,
            variants: vec![
                Variant {
                    color: Some("Navy".into()),
                    size: Some("L".into()),
                    stock: 2,
                },
                Variant {
                    color: Some(" ".into()),
                    size: None,
                    stock: 1,
                },
            ],
            ..Default::default()
        };

        let prepared = draft.prepare().unwrap();
        assert_eq!(prepared.variants.len(), 1);
        assert_eq!(prepared.stock_quantity, 1);
        assert_eq!(prepared.condition, Condition::UsedGood);
        assert_eq!(prepared.category, Category::Other);
    }

    #[test]
    fn all_blank_variants_are_rejected() {
        let draft = NewListing {
            title: "Scrubs".into(),
            price: 250.0,
            variants: vec![Variant::default()],
            ..Default::default()
        };
        assert!(matches!(draft.prepare(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn stock_update_rejects_negative() {
        assert!(StockUpdate::new(-1).is_err());
        assert_eq!(StockUpdate::new(0).unwrap().stock_quantity, 0);
    }
}
