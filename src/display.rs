//! Derived, display-only values computed from a listing.
//!
//! Nothing here is persisted or sent back to the backend. In particular the
//! "was" price is cosmetic and must not be treated as a real price history.

use reqwest::Url;
use serde::Serialize;

use crate::models::{non_blank, Listing};

pub const CARD_PLACEHOLDER: &str = "https://placehold.co/400x300?text=No+Image";
pub const DETAIL_PLACEHOLDER: &str = "https://placehold.co/600x600?text=No+Image";

/// Listings with this many units or fewer get the "only N left" badge.
pub const LOW_STOCK_LIMIT: u32 = 5;

/// Where a listing is being rendered. Card and detail views disagree on a
/// few constants and both variants are kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DisplayContext {
    Card,
    Detail,
}

impl DisplayContext {
    /// Price above which a struck-through "was" price is shown.
    pub fn discount_threshold(self) -> f64 {
        match self {
            DisplayContext::Card => 500.0,
            DisplayContext::Detail => 1000.0,
        }
    }

    pub fn discount_multiplier(self) -> f64 {
        match self {
            DisplayContext::Card => 1.2,
            DisplayContext::Detail => 1.15,
        }
    }

    pub fn placeholder_image(self) -> &'static str {
        match self {
            DisplayContext::Card => CARD_PLACEHOLDER,
            DisplayContext::Detail => DETAIL_PLACEHOLDER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StockBadge {
    SoldOut,
    LowStock(u32),
    InStock,
}

impl StockBadge {
    pub fn from_quantity(stock_quantity: u32) -> Self {
        match stock_quantity {
            0 => StockBadge::SoldOut,
            n if n <= LOW_STOCK_LIMIT => StockBadge::LowStock(n),
            _ => StockBadge::InStock,
        }
    }

    pub fn is_sold_out(self) -> bool {
        self == StockBadge::SoldOut
    }

    pub fn label(self) -> String {
        match self {
            StockBadge::SoldOut => "Sold Out".to_string(),
            StockBadge::LowStock(n) => format!("Only {} left!", n),
            StockBadge::InStock => "In stock".to_string(),
        }
    }
}

/// First gallery image, then the single fallback image, then a placeholder.
pub fn primary_image(listing: &Listing, context: DisplayContext) -> &str {
    listing
        .image_urls
        .first()
        .and_then(|url| non_blank(Some(url.as_str())))
        .or_else(|| non_blank(listing.image_url.as_deref()))
        .unwrap_or(context.placeholder_image())
}

pub fn discount_display(price: f64, context: DisplayContext) -> Option<f64> {
    (price > context.discount_threshold()).then(|| price * context.discount_multiplier())
}

/// Whether the outbound contact action may be offered at all.
/// Sold-out listings never are, whatever the seller's contact details.
pub fn contact_available(whatsapp_phone: Option<&str>, badge: StockBadge) -> bool {
    !badge.is_sold_out() && non_blank(whatsapp_phone).is_some()
}

/// Pre-filled WhatsApp chat link for a listing, when contact is available.
pub fn contact_url(listing: &Listing) -> Option<String> {
    let badge = StockBadge::from_quantity(listing.stock_quantity);
    if !contact_available(listing.whatsapp_phone.as_deref(), badge) {
        return None;
    }

    let phone = listing.contact_phone()?;
    let message = format!(
        "Hi! Interested in your {} for K{:.0} on Campus-Connect!",
        listing.display_title(),
        listing.price.round()
    );

    Url::parse_with_params(&format!("https://wa.me/{}", phone), &[("text", message)])
        .ok()
        .map(String::from)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    /// Filled stars out of five
    pub stars: u8,
    pub label: String,
}

impl RatingSummary {
    pub fn new(average_rating: f64, rating_count: u32) -> Self {
        let average = if average_rating.is_finite() {
            average_rating.clamp(0.0, 5.0)
        } else {
            0.0
        };

        let label = if rating_count > 0 {
            format!("{:.1} ({})", average, rating_count)
        } else {
            "No ratings yet".to_string()
        };

        Self {
            stars: average.round() as u8,
            label,
        }
    }
}

/// Kwacha amount with thousands grouping and at most three decimals.
pub fn format_price(amount: f64) -> String {
    if !amount.is_finite() {
        return "K0".to_string();
    }

    let millis = (amount.abs() * 1000.0).round() as u64;
    let whole = millis / 1000;
    let fraction = match millis % 1000 {
        0 => String::new(),
        frac => format!(".{:03}", frac).trim_end_matches('0').to_string(),
    };

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && millis > 0 { "-" } else { "" };
    format!("{}K{}{}", sign, grouped, fraction)
}

/// Everything a rendering surface needs for one listing.
#[derive(Debug, Clone, Serialize)]
pub struct ListingView {
    pub id: u64,
    pub title: String,
    pub condition: String,
    pub price_label: String,
    pub was_price_label: Option<String>,
    pub primary_image: String,
    pub photo_count: usize,
    pub stock: StockBadge,
    pub contact_available: bool,
    pub contact_url: Option<String>,
    pub rating: RatingSummary,
    pub has_variants: bool,
    pub seller_id: Option<u64>,
}

impl ListingView {
    pub fn new(listing: &Listing, context: DisplayContext) -> Self {
        let stock = StockBadge::from_quantity(listing.stock_quantity);

        Self {
            id: listing.id,
            title: listing.display_title().to_string(),
            condition: listing.display_condition().to_string(),
            price_label: format_price(listing.price),
            was_price_label: discount_display(listing.price, context).map(format_price),
            primary_image: primary_image(listing, context).to_string(),
            photo_count: listing.image_urls.len(),
            stock,
            contact_available: contact_available(listing.whatsapp_phone.as_deref(), stock),
            contact_url: contact_url(listing),
            rating: RatingSummary::new(listing.average_rating, listing.rating_count),
            has_variants: !listing.variants.is_empty(),
            seller_id: listing.user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_badge_boundaries() {
        assert_eq!(StockBadge::from_quantity(0), StockBadge::SoldOut);
        assert_eq!(StockBadge::from_quantity(1), StockBadge::LowStock(1));
        assert_eq!(StockBadge::from_quantity(5), StockBadge::LowStock(5));
        assert_eq!(StockBadge::from_quantity(6), StockBadge::InStock);
        assert_eq!(StockBadge::LowStock(2).label(), "Only 2 left!");
    }

    #[test]
    fn contact_needs_stock_and_phone() {
        let phone = Some("260977123456");
        assert!(!contact_available(phone, StockBadge::from_quantity(0)));
        assert!(!contact_available(Some(""), StockBadge::from_quantity(3)));
        assert!(!contact_available(Some("   "), StockBadge::from_quantity(3)));
        assert!(!contact_available(None, StockBadge::from_quantity(3)));
        assert!(contact_available(phone, StockBadge::from_quantity(3)));
    }

    #[test]
    fn primary_image_fallbacks() {
        let mut listing = Listing::default();
        assert_eq!(primary_image(&listing, DisplayContext::Card), CARD_PLACEHOLDER);
        assert_eq!(primary_image(&listing, DisplayContext::Detail), DETAIL_PLACEHOLDER);

        listing.image_url = Some("https://img/fallback.jpg".into());
        assert_eq!(primary_image(&listing, DisplayContext::Card), "https://img/fallback.jpg");

        listing.image_urls = vec!["https://img/a.jpg".into(), "https://img/b.jpg".into()];
        assert_eq!(primary_image(&listing, DisplayContext::Card), "https://img/a.jpg");

        listing.image_urls = vec![String::new()];
        listing.image_url = Some(String::new());
        assert_eq!(primary_image(&listing, DisplayContext::Card), CARD_PLACEHOLDER);
    }

    #[test]
    fn discount_only_above_threshold() {
        assert_eq!(discount_display(500.0, DisplayContext::Card), None);
        let card = discount_display(600.0, DisplayContext::Card).unwrap();
        assert!((card - 720.0).abs() < 1e-9);
        assert_eq!(discount_display(1000.0, DisplayContext::Detail), None);
        let was = discount_display(2000.0, DisplayContext::Detail).unwrap();
        assert!((was - 2300.0).abs() < 1e-9);
    }

    #[test]
    fn contact_url_encodes_message() {
        let listing = Listing {
            title: Some("Lab Coat".into()),
            price: 149.6,
            stock_quantity: 2,
            whatsapp_phone: Some(" 260977123456 ".into()),
            ..Default::default()
        };

        let url = contact_url(&listing).unwrap();
        assert!(url.starts_with("https://wa.me/260977123456?text="));
        assert!(url.contains("Lab+Coat"));
        assert!(url.contains("K150"));

        let sold_out = Listing {
            stock_quantity: 0,
            ..listing
        };
        assert_eq!(contact_url(&sold_out), None);
    }

    #[test]
    fn rating_summary_labels() {
        assert_eq!(RatingSummary::new(0.0, 0).label, "No ratings yet");
        let summary = RatingSummary::new(4.46, 12);
        assert_eq!(summary.stars, 4);
        assert_eq!(summary.label, "4.5 (12)");
        assert_eq!(RatingSummary::new(4.5, 1).stars, 5);
    }

    #[test]
    fn price_formatting() {
        assert_eq!(format_price(0.0), "K0");
        assert_eq!(format_price(1234.0), "K1,234");
        assert_eq!(format_price(1234567.5), "K1,234,567.5");
        assert_eq!(format_price(500.01), "K500.01");
        assert_eq!(format_price(f64::NAN), "K0");
    }

    #[test]
    fn view_combines_derived_values() {
        let listing = Listing {
            id: 9,
            price: 750.0,
            stock_quantity: 0,
            whatsapp_phone: Some("260977123456".into()),
            image_urls: vec!["https://img/1.jpg".into(), "https://img/2.jpg".into()],
            ..Default::default()
        };

        let view = ListingView::new(&listing, DisplayContext::Card);
        assert_eq!(view.title, "No Title");
        assert_eq!(view.was_price_label.as_deref(), Some("K900"));
        assert_eq!(view.photo_count, 2);
        assert_eq!(view.stock, StockBadge::SoldOut);
        assert!(!view.contact_available);
        assert_eq!(view.contact_url, None);

        let detail = ListingView::new(&listing, DisplayContext::Detail);
        assert_eq!(detail.was_price_label, None);
    }
}
