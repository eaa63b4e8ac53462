use serde::Serialize;
use tracing::{debug, warn};

use super::ProjectCard;
use crate::db::{Project, Store};
use crate::listing::{
    category_chips, fixed_categories, select_visible, CategoryChip, CategoryFilter, Listing, PORTFOLIO_CATEGORIES,
};

pub const EMPTY_MESSAGE: &str = "No projects found in this category.";

const CARD_TOOLS: usize = 4;

pub struct PortfolioPage {
    projects: Vec<Project>,
    categories: Vec<CategoryFilter>,
    filter: CategoryFilter,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioView {
    pub filter: CategoryFilter,
    pub categories: Vec<CategoryChip>,
    pub projects: Listing<ProjectCard>,
}

impl Default for PortfolioPage {
    fn default() -> Self {
        Self::new()
    }
}

impl PortfolioPage {
    pub fn new() -> Self {
        Self {
            projects: Vec::new(),
            categories: fixed_categories(PORTFOLIO_CATEGORIES),
            filter: CategoryFilter::ShowAll,
        }
    }

    pub async fn load(&mut self, store: &Store) {
        match store.projects(None).await {
            Ok(projects) => self.projects = projects,
            Err(e) => warn!(error = %e, "Failed to load projects"),
        }
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// Switch filters. Filters outside the fixed category list are refused.
    pub fn select(&mut self, filter: CategoryFilter) -> bool {
        if !self.categories.contains(&filter) {
            debug!(filter = %filter, "Ignoring unknown portfolio category");
            return false;
        }
        self.filter = filter;
        true
    }

    pub fn view(&self) -> PortfolioView {
        let cards = select_visible(&self.projects, &self.filter)
            .into_iter()
            .map(|p| ProjectCard::new(p, CARD_TOOLS))
            .collect();

        PortfolioView {
            filter: self.filter.clone(),
            categories: category_chips(&self.categories, &self.filter),
            projects: Listing::new(cards, EMPTY_MESSAGE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::*;
    use crate::db::Table;

    async fn loaded() -> (PortfolioPage, tempfile::TempDir) {
        let (store, db, dir) = sqlite_store();
        db.insert(Table::Projects, project_row("campus", "Field Studies", 2)).unwrap();
        db.insert(Table::Projects, project_row("thesis", "Academic", 1)).unwrap();
        db.insert(Table::Projects, project_row("legacy", "Archive", 3)).unwrap();

        let mut page = PortfolioPage::new();
        page.load(&store).await;
        (page, dir)
    }

    #[tokio::test]
    async fn test_show_all_lists_every_project_in_order() {
        let (page, _dir) = loaded().await;
        let view = page.view();

        let Listing::Items { items } = view.projects else {
            panic!("expected projects");
        };
        let slugs: Vec<&str> = items.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, vec!["thesis", "campus", "legacy"]);
        assert_eq!(items[0].tools.len(), 4);
        assert_eq!(items[0].role.as_deref(), Some("Assistant Project Manager"));
    }

    #[tokio::test]
    async fn test_empty_category_shows_message() {
        let (mut page, _dir) = loaded().await;
        assert!(page.select(CategoryFilter::category("Technical Reports")));

        assert_eq!(
            page.view().projects,
            Listing::Empty {
                message: "No projects found in this category."
            }
        );
    }

    #[tokio::test]
    async fn test_unlisted_category_is_unreachable() {
        let (mut page, _dir) = loaded().await;
        assert!(page.select(CategoryFilter::category("Academic")));

        assert!(!page.select(CategoryFilter::category("Archive")));
        assert_eq!(page.filter(), &CategoryFilter::category("Academic"));
        assert_eq!(page.view().projects.len(), 1);
    }
}
