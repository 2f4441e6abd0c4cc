pub mod coerce;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use coerce::{de_amount, de_count, de_id, de_opt_id, de_opt_label, de_opt_text, de_rating, de_seq, de_urls};

pub const DEFAULT_TITLE: &str = "No Title";
pub const DEFAULT_DESCRIPTION: &str = "No description available";
pub const UNKNOWN_CONDITION: &str = "Unknown";

/// Item condition as offered by the listing form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Condition {
    New,
    UsedExcellent,
    UsedGood,
    UsedFair,
    /// Anything the backend sends that is not one of the known labels.
    Unlisted(String),
}

impl Condition {
    pub const KNOWN: [Condition; 4] = [
        Condition::New,
        Condition::UsedExcellent,
        Condition::UsedGood,
        Condition::UsedFair,
    ];

    pub fn label(&self) -> &str {
        match self {
            Condition::New => "New",
            Condition::UsedExcellent => "Used - Excellent",
            Condition::UsedGood => "Used - Good",
            Condition::UsedFair => "Used - Fair",
            Condition::Unlisted(raw) => raw,
        }
    }
}

impl From<String> for Condition {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "New" => Condition::New,
            "Used - Excellent" => Condition::UsedExcellent,
            "Used - Good" => Condition::UsedGood,
            "Used - Fair" => Condition::UsedFair,
            _ => Condition::Unlisted(raw),
        }
    }
}

impl From<&str> for Condition {
    fn from(raw: &str) -> Self {
        Condition::from(raw.to_string())
    }
}

impl From<Condition> for String {
    fn from(condition: Condition) -> Self {
        condition.label().to_string()
    }
}

// Equality is by label, so an `Unlisted` spelling of a known label still matches it.
impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        self.label() == other.label()
    }
}

impl Eq for Condition {}

impl Hash for Condition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label().hash(state);
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Marketplace category labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Accommodation,
    Books,
    ClothesMen,
    ClothesWomen,
    MedicalFootwear,
    ElectronicGadgets,
    Furniture,
    Jewellery,
    LabCoatsAndScrubs,
    MedicalEquipment,
    Other,
    Shoes,
    Stationery,
    Stethoscopes,
    Unlisted(String),
}

impl Category {
    pub const KNOWN: [Category; 14] = [
        Category::Accommodation,
        Category::Books,
        Category::ClothesMen,
        Category::ClothesWomen,
        Category::MedicalFootwear,
        Category::ElectronicGadgets,
        Category::Furniture,
        Category::Jewellery,
        Category::LabCoatsAndScrubs,
        Category::MedicalEquipment,
        Category::Other,
        Category::Shoes,
        Category::Stationery,
        Category::Stethoscopes,
    ];

    pub fn label(&self) -> &str {
        match self {
            Category::Accommodation => "Accommodation",
            Category::Books => "Books",
            Category::ClothesMen => "Clothes - Men",
            Category::ClothesWomen => "Clothes - Women",
            Category::MedicalFootwear => "Crocs & Medical Footwear",
            Category::ElectronicGadgets => "Electronic Gadgets",
            Category::Furniture => "Furniture",
            Category::Jewellery => "Jewellery",
            Category::LabCoatsAndScrubs => "Lab Coats & Scrubs",
            Category::MedicalEquipment => "Medical Equipment & Tools",
            Category::Other => "Other",
            Category::Shoes => "Shoes",
            Category::Stationery => "Stationery & Study Aids",
            Category::Stethoscopes => "Stethoscopes & Diagnostic Tools",
            Category::Unlisted(raw) => raw,
        }
    }
}

impl From<String> for Category {
    fn from(raw: String) -> Self {
        Category::KNOWN
            .iter()
            .find(|known| known.label() == raw)
            .cloned()
            .unwrap_or(Category::Unlisted(raw))
    }
}

impl From<&str> for Category {
    fn from(raw: &str) -> Self {
        Category::from(raw.to_string())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.label().to_string()
    }
}

// Equality is by label, so an `Unlisted` spelling of a known label still matches it.
impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.label() == other.label()
    }
}

impl Eq for Category {}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label().hash(state);
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A color/size option with its own stock.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Variant {
    #[serde(deserialize_with = "de_opt_text")]
    pub color: Option<String>,
    #[serde(deserialize_with = "de_opt_text")]
    pub size: Option<String>,
    #[serde(deserialize_with = "de_count")]
    pub stock: u32,
}

impl Variant {
    pub fn is_available(&self) -> bool {
        self.stock > 0
    }

    /// "Red / M", "— / M" without a color, "Red" without a size.
    pub fn label(&self) -> String {
        let color = non_blank(self.color.as_deref()).unwrap_or("—");
        match non_blank(self.size.as_deref()) {
            Some(size) => format!("{} / {}", color, size),
            None => color.to_string(),
        }
    }
}

/// A marketplace listing as served by `/api/listings`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Listing {
    #[serde(deserialize_with = "de_id")]
    pub id: u64,
    #[serde(deserialize_with = "de_opt_text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "de_amount")]
    pub price: f64,
    #[serde(deserialize_with = "de_opt_text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "de_opt_label")]
    pub condition: Option<Condition>,
    #[serde(deserialize_with = "de_opt_label")]
    pub category: Option<Category>,
    #[serde(deserialize_with = "de_opt_text")]
    pub whatsapp_phone: Option<String>,
    #[serde(deserialize_with = "de_opt_text")]
    pub image_url: Option<String>,
    #[serde(deserialize_with = "de_urls")]
    pub image_urls: Vec<String>,
    #[serde(deserialize_with = "de_opt_id")]
    pub user_id: Option<u64>,
    #[serde(deserialize_with = "de_count")]
    pub stock_quantity: u32,
    #[serde(deserialize_with = "de_rating")]
    pub average_rating: f64,
    #[serde(deserialize_with = "de_count")]
    pub rating_count: u32,
    #[serde(deserialize_with = "de_seq")]
    pub variants: Vec<Variant>,
}

impl Listing {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    pub fn display_description(&self) -> &str {
        self.description.as_deref().unwrap_or(DEFAULT_DESCRIPTION)
    }

    pub fn display_condition(&self) -> &str {
        self.condition
            .as_ref()
            .map(Condition::label)
            .unwrap_or(UNKNOWN_CONDITION)
    }

    /// Seller phone, if there is anything left after trimming.
    pub fn contact_phone(&self) -> Option<&str> {
        non_blank(self.whatsapp_phone.as_deref())
    }
}

/// Listings saved to disk after a fetch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSnapshot {
    pub source: String,
    pub fetched_at: DateTime<Utc>,
    pub listings: Vec<Listing>,
}

impl ListingSnapshot {
    pub fn new(source: impl Into<String>, listings: Vec<Listing>) -> Self {
        Self {
            source: source.into(),
            fetched_at: Utc::now(),
            listings,
        }
    }
}

pub(crate) fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}
