pub mod types;

pub use types::{FilterSpec, Selection};

use crate::models::Listing;
use tracing::debug;

impl FilterSpec {
    /// True when the listing passes every active predicate.
    pub fn matches(&self, listing: &Listing) -> bool {
        self.matches_search(listing)
            && self.condition.admits(listing.condition.as_ref())
            && self.category.admits(listing.category.as_ref())
            && self.matches_price(listing.price)
    }

    fn matches_search(&self, listing: &Listing) -> bool {
        if self.search_term.trim().is_empty() {
            return true;
        }

        // The untrimmed term is what gets matched, only emptiness is judged trimmed
        let term = self.search_term.to_lowercase();
        let contains = |field: &Option<String>| {
            field
                .as_deref()
                .map(|text| text.to_lowercase().contains(&term))
                .unwrap_or(false)
        };

        contains(&listing.title) || contains(&listing.description)
    }

    fn matches_price(&self, price: f64) -> bool {
        let meets_min = price >= self.lower_bound();
        let meets_max = self.upper_bound().map_or(true, |max| price <= max);
        meets_min && meets_max
    }
}

/// Narrow `listings` down to the ones `spec` admits.
///
/// The result keeps the input order; nothing is re-sorted and nothing is
/// copied, so this is cheap enough to run on every keystroke.
pub fn filter<'a>(listings: &'a [Listing], spec: &FilterSpec) -> Vec<&'a Listing> {
    let kept: Vec<&Listing> = listings.iter().filter(|l| spec.matches(l)).collect();
    debug!("Filter kept {} of {} listings", kept.len(), listings.len());
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Condition};

    fn listing(id: u64, title: &str, price: f64) -> Listing {
        Listing {
            id,
            title: Some(title.to_string()),
            price,
            ..Default::default()
        }
    }

    #[test]
    fn search_matches_title_or_description() {
        let mut by_desc = listing(2, "Scrubs", 150.0);
        by_desc.description = Some("Fits a STETHOSCOPE pocket".into());
        let items = vec![listing(1, "Littmann Stethoscope", 900.0), by_desc, listing(3, "Desk", 400.0)];

        let kept = filter(&items, &FilterSpec::new().with_search("stetho"));
        let ids: Vec<u64> = kept.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn blank_search_is_inactive() {
        let items = vec![listing(1, "Desk", 10.0), Listing::default()];
        assert_eq!(filter(&items, &FilterSpec::new().with_search("   ")).len(), 2);
    }

    #[test]
    fn search_skips_listings_without_text() {
        let items = vec![Listing::default()];
        assert!(filter(&items, &FilterSpec::new().with_search("no title")).is_empty());
    }

    #[test]
    fn condition_and_category_must_match_exactly() {
        let mut a = listing(1, "Coat", 200.0);
        a.condition = Some(Condition::New);
        a.category = Some(Category::LabCoatsAndScrubs);
        let mut b = listing(2, "Coat", 200.0);
        b.condition = Some(Condition::UsedGood);
        b.category = Some(Category::LabCoatsAndScrubs);
        let c = listing(3, "Coat", 200.0);
        let items = vec![a, b, c];

        let spec = FilterSpec::new()
            .with_condition(Condition::New)
            .with_category(Category::LabCoatsAndScrubs);
        let kept = filter(&items, &spec);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 1);

        let by_category = FilterSpec::new().with_category(Category::LabCoatsAndScrubs);
        assert_eq!(filter(&items, &by_category).len(), 2);
    }

    #[test]
    fn unlisted_condition_matches_its_own_label() {
        let mut odd = listing(1, "Kettle", 80.0);
        odd.condition = Some(Condition::from("Refurbished"));
        let items = vec![odd];

        let spec = FilterSpec {
            condition: Selection::parse("Refurbished"),
            ..FilterSpec::default()
        };
        assert_eq!(filter(&items, &spec).len(), 1);
    }

    #[test]
    fn unlisted_spelling_of_known_label_still_matches() {
        let mut scope = listing(1, "Otoscope", 600.0);
        scope.condition = Some(Condition::New);
        scope.category = Some(Category::Unlisted("Books".into()));
        let items = vec![scope];

        let spec = FilterSpec {
            condition: Selection::Only(Condition::Unlisted("New".into())),
            category: Selection::Only(Category::Books),
            ..FilterSpec::default()
        };
        assert_eq!(filter(&items, &spec).len(), 1);
    }

    #[test]
    fn padded_all_is_a_real_label() {
        let mut coat = listing(1, "Coat", 200.0);
        coat.condition = Some(Condition::New);
        let items = vec![coat];

        let spec = FilterSpec {
            condition: Selection::parse(" All "),
            ..FilterSpec::default()
        };
        assert_eq!(spec.condition, Selection::Only(Condition::Unlisted(" All ".into())));
        assert!(filter(&items, &spec).is_empty());
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let items = vec![listing(1, "A", 500.0)];
        assert_eq!(filter(&items, &FilterSpec::new().with_min_price(500.0)).len(), 1);
        assert_eq!(filter(&items, &FilterSpec::new().with_max_price(Some(500.0))).len(), 1);
        assert!(filter(&items, &FilterSpec::new().with_max_price(Some(499.99))).is_empty());
    }

    #[test]
    fn non_positive_max_is_unbounded() {
        let items = vec![listing(1, "Room", 100_000.0)];
        assert_eq!(filter(&items, &FilterSpec::new().with_max_price(Some(0.0))).len(), 1);
        assert_eq!(filter(&items, &FilterSpec::new().with_max_price(Some(-5.0))).len(), 1);
        assert_eq!(filter(&items, &FilterSpec::new().with_max_price(Some(f64::NAN))).len(), 1);
    }

    #[test]
    fn nan_min_price_acts_as_zero() {
        let items = vec![listing(1, "Free pens", 0.0)];
        assert_eq!(filter(&items, &FilterSpec::new().with_min_price(f64::NAN)).len(), 1);
    }

    #[test]
    fn selection_parse() {
        assert_eq!(Selection::<Condition>::parse("All"), Selection::All);
        assert_eq!(Selection::<Condition>::parse(""), Selection::All);
        assert_eq!(Selection::<Condition>::parse("New"), Selection::Only(Condition::New));
    }
}
