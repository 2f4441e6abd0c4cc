use serde::{Deserialize, Serialize};

use crate::models::{Category, Condition};

/// A dropdown choice: either everything, or one specific value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: From<String>> Selection<T> {
    /// Exactly "All" (or an empty choice) selects everything, any other label
    /// selects that value verbatim.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "" | "All" => Selection::All,
            _ => Selection::Only(T::from(raw.to_string())),
        }
    }
}

impl<T: PartialEq> Selection<T> {
    /// A missing value only passes the `All` selection.
    pub fn admits(&self, value: Option<&T>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => value == Some(wanted),
        }
    }
}

/// User-driven filter state for the marketplace view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Case-insensitive substring matched against title and description
    pub search_term: String,
    pub condition: Selection<Condition>,
    pub category: Selection<Category>,
    /// Inclusive lower bound (K)
    pub min_price: f64,
    /// Inclusive upper bound (K); `None` or anything <= 0 means no limit
    pub max_price: Option<f64>,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            condition: Selection::All,
            category: Selection::All,
            min_price: 0.0,
            max_price: None,
        }
    }
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Selection::Only(condition);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Selection::Only(category);
        self
    }

    pub fn with_min_price(mut self, min_price: f64) -> Self {
        self.min_price = min_price;
        self
    }

    pub fn with_max_price(mut self, max_price: Option<f64>) -> Self {
        self.max_price = max_price;
        self
    }

    pub(crate) fn lower_bound(&self) -> f64 {
        if self.min_price.is_nan() {
            0.0
        } else {
            self.min_price
        }
    }

    pub(crate) fn upper_bound(&self) -> Option<f64> {
        self.max_price.filter(|max| *max > 0.0)
    }
}
