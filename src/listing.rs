//! Category filtering shared by the portfolio, blog and gallery pages.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::db::{BlogPost, GalleryImage, Project};

/// Label shown for the "no restriction" filter.
pub const ALL_LABEL: &str = "All";

pub const PORTFOLIO_CATEGORIES: &[&str] = &["Academic", "Field Studies", "Technical Reports"];

pub const BLOG_CATEGORIES: &[&str] = &["Engineering", "BIM", "Project Insights", "Career Journey"];

/// The active filter of a listing page.
///
/// `ShowAll` is distinct from a real category that happens to be named "All".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "label", rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    ShowAll,
    ShowCategory(String),
}

impl CategoryFilter {
    pub fn category(label: impl Into<String>) -> Self {
        CategoryFilter::ShowCategory(label.into())
    }

    /// Absent query parameter selects everything.
    pub fn from_query(category: Option<String>) -> Self {
        match category {
            Some(label) => CategoryFilter::ShowCategory(label),
            None => CategoryFilter::ShowAll,
        }
    }

    /// Query parsing for pages with a fixed category list, where the "All"
    /// chip label can only mean `ShowAll`.
    pub fn from_fixed_query(category: Option<String>, categories: &[&str]) -> Self {
        match category {
            Some(label) if label == ALL_LABEL && !categories.contains(&ALL_LABEL) => CategoryFilter::ShowAll,
            other => CategoryFilter::from_query(other),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::ShowAll => ALL_LABEL,
            CategoryFilter::ShowCategory(label) => label,
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::ShowAll => true,
            CategoryFilter::ShowCategory(label) => label == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Records that belong to exactly one category.
pub trait Categorized {
    fn category(&self) -> &str;
}

impl Categorized for Project {
    fn category(&self) -> &str {
        &self.category
    }
}

impl Categorized for BlogPost {
    fn category(&self) -> &str {
        &self.category
    }
}

impl Categorized for GalleryImage {
    fn category(&self) -> &str {
        self.effective_category()
    }
}

/// The records visible under `filter`, in their original relative order.
pub fn select_visible<'a, T: Categorized>(records: &'a [T], filter: &CategoryFilter) -> Vec<&'a T> {
    records.iter().filter(|r| filter.matches(r.category())).collect()
}

/// `ShowAll` followed by a filter for each listed category.
pub fn fixed_categories(labels: &[&str]) -> Vec<CategoryFilter> {
    std::iter::once(CategoryFilter::ShowAll)
        .chain(labels.iter().map(|label| CategoryFilter::category(*label)))
        .collect()
}

/// `ShowAll` followed by each distinct category present, in first-seen order.
pub fn derived_categories<T: Categorized>(records: &[T]) -> Vec<CategoryFilter> {
    let mut seen = HashSet::new();
    std::iter::once(CategoryFilter::ShowAll)
        .chain(
            records
                .iter()
                .map(Categorized::category)
                .filter(|category| seen.insert(*category))
                .map(CategoryFilter::category),
        )
        .collect()
}

/// A rendered list, or the message shown when nothing matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Listing<T> {
    Items { items: Vec<T> },
    Empty { message: &'static str },
}

impl<T> Listing<T> {
    pub fn new(items: Vec<T>, empty_message: &'static str) -> Self {
        if items.is_empty() {
            Listing::Empty {
                message: empty_message,
            }
        } else {
            Listing::Items { items }
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Listing<U> {
        match self {
            Listing::Items { items } => Listing::Items {
                items: items.into_iter().map(f).collect(),
            },
            Listing::Empty { message } => Listing::Empty { message },
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Listing::Items { items } => items.len(),
            Listing::Empty { .. } => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Listing::Empty { .. })
    }
}

/// Chip row for a listing page: each available filter and whether it is active.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryChip {
    pub filter: CategoryFilter,
    pub label: String,
    pub active: bool,
}

pub fn category_chips(available: &[CategoryFilter], active: &CategoryFilter) -> Vec<CategoryChip> {
    available
        .iter()
        .map(|filter| CategoryChip {
            filter: filter.clone(),
            label: filter.label().to_string(),
            active: filter == active,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Item(&'static str, &'static str);

    impl Categorized for Item {
        fn category(&self) -> &str {
            self.1
        }
    }

    fn items() -> Vec<Item> {
        vec![
            Item("a", "Academic"),
            Item("b", "Field Studies"),
            Item("c", "Academic"),
            Item("d", "All"),
            Item("e", "Technical Reports"),
        ]
    }

    #[test]
    fn test_show_all_returns_everything_in_order() {
        let records = items();
        let visible = select_visible(&records, &CategoryFilter::ShowAll);
        let expected: Vec<&Item> = records.iter().collect();
        assert_eq!(visible, expected);
    }

    #[test]
    fn test_category_filter_keeps_exact_matches_in_order() {
        let records = items();
        let visible = select_visible(&records, &CategoryFilter::category("Academic"));
        assert_eq!(visible, vec![&records[0], &records[2]]);

        // No partial or case-insensitive matching.
        assert!(select_visible(&records, &CategoryFilter::category("academic")).is_empty());
    }

    #[test]
    fn test_category_literally_named_all_is_not_show_all() {
        let records = items();
        let visible = select_visible(&records, &CategoryFilter::category("All"));
        assert_eq!(visible, vec![&records[3]]);
    }

    #[test]
    fn test_all_label_on_fixed_lists() {
        assert_eq!(
            CategoryFilter::from_fixed_query(Some("All".to_string()), PORTFOLIO_CATEGORIES),
            CategoryFilter::ShowAll
        );
        assert_eq!(
            CategoryFilter::from_fixed_query(Some("Academic".to_string()), PORTFOLIO_CATEGORIES),
            CategoryFilter::category("Academic")
        );
        assert_eq!(
            CategoryFilter::from_fixed_query(Some("All".to_string()), &["All", "Other"]),
            CategoryFilter::category("All")
        );
        assert_eq!(
            CategoryFilter::from_query(Some("All".to_string())),
            CategoryFilter::category("All")
        );
    }

    #[test]
    fn test_derived_categories_distinct_in_first_seen_order() {
        let categories = derived_categories(&items());
        let labels: Vec<&str> = categories.iter().map(CategoryFilter::label).collect();
        assert_eq!(
            labels,
            vec!["All", "Academic", "Field Studies", "All", "Technical Reports"]
        );
        assert_eq!(categories[0], CategoryFilter::ShowAll);
        assert_eq!(categories[3], CategoryFilter::category("All"));
    }

    #[test]
    fn test_derived_categories_of_nothing() {
        let empty: Vec<Item> = Vec::new();
        assert_eq!(derived_categories(&empty), vec![CategoryFilter::ShowAll]);
    }

    #[test]
    fn test_fixed_categories() {
        let categories = fixed_categories(PORTFOLIO_CATEGORIES);
        assert_eq!(categories.len(), 4);
        assert_eq!(categories[0], CategoryFilter::ShowAll);
        assert_eq!(categories[3], CategoryFilter::category("Technical Reports"));
    }

    #[test]
    fn test_listing_empty_state() {
        let listing: Listing<u32> = Listing::new(Vec::new(), "Nothing here.");
        assert!(listing.is_empty());
        assert_eq!(listing, Listing::Empty { message: "Nothing here." });

        let listing = Listing::new(vec![1, 2], "Nothing here.").map(|n| n * 10);
        assert_eq!(listing, Listing::Items { items: vec![10, 20] });
        assert_eq!(listing.len(), 2);
    }

    #[test]
    fn test_filter_serialization() {
        assert_eq!(
            serde_json::to_value(CategoryFilter::ShowAll).unwrap(),
            serde_json::json!({ "kind": "show_all" })
        );
        assert_eq!(
            serde_json::to_value(CategoryFilter::category("BIM")).unwrap(),
            serde_json::json!({ "kind": "show_category", "label": "BIM" })
        );
    }

    #[test]
    fn test_chips_mark_active_filter() {
        let available = fixed_categories(BLOG_CATEGORIES);
        let chips = category_chips(&available, &CategoryFilter::category("BIM"));
        let active: Vec<&str> = chips.iter().filter(|c| c.active).map(|c| c.label.as_str()).collect();
        assert_eq!(active, vec!["BIM"]);
    }
}
