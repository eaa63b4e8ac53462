use serde::Serialize;
use tracing::{debug, warn};

use crate::db::models::display_date;
use crate::db::{BlogPost, Store};
use crate::listing::{
    category_chips, fixed_categories, select_visible, CategoryChip, CategoryFilter, Listing, BLOG_CATEGORIES,
};

pub const EMPTY_MESSAGE: &str = "No posts found in this category.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogCard {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub category: String,
    pub image_url: Option<String>,
    /// e.g. "Mar 15, 2024"; absent when the stored timestamp is unreadable.
    pub date: Option<String>,
    /// e.g. "8 min"
    pub read_time: String,
}

impl From<&BlogPost> for BlogCard {
    fn from(post: &BlogPost) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            category: post.category.clone(),
            image_url: post.image_url.clone(),
            date: display_date(&post.created_at),
            read_time: format!("{} min", post.read_time),
        }
    }
}

pub struct BlogPage {
    posts: Vec<BlogPost>,
    categories: Vec<CategoryFilter>,
    filter: CategoryFilter,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogView {
    pub filter: CategoryFilter,
    pub categories: Vec<CategoryChip>,
    pub posts: Listing<BlogCard>,
}

impl Default for BlogPage {
    fn default() -> Self {
        Self::new()
    }
}

impl BlogPage {
    pub fn new() -> Self {
        Self {
            posts: Vec::new(),
            categories: fixed_categories(BLOG_CATEGORIES),
            filter: CategoryFilter::ShowAll,
        }
    }

    pub async fn load(&mut self, store: &Store) {
        match store.published_posts().await {
            Ok(posts) => self.posts = posts,
            Err(e) => warn!(error = %e, "Failed to load blog posts"),
        }
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    pub fn select(&mut self, filter: CategoryFilter) -> bool {
        if !self.categories.contains(&filter) {
            debug!(filter = %filter, "Ignoring unknown blog category");
            return false;
        }
        self.filter = filter;
        true
    }

    pub fn view(&self) -> BlogView {
        let cards = select_visible(&self.posts, &self.filter)
            .into_iter()
            .map(BlogCard::from)
            .collect();

        BlogView {
            filter: self.filter.clone(),
            categories: category_chips(&self.categories, &self.filter),
            posts: Listing::new(cards, EMPTY_MESSAGE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::*;
    use crate::db::Table;
    use serde_json::json;

    fn post(slug: &str, category: &str, published: bool, created_at: &str) -> serde_json::Value {
        json!({
            "title": slug,
            "slug": slug,
            "excerpt": "excerpt",
            "content": "content",
            "category": category,
            "read_time": 8,
            "published": published,
            "created_at": created_at,
        })
    }

    #[tokio::test]
    async fn test_cards_are_formatted() {
        let (store, db, _dir) = sqlite_store();
        db.insert(Table::BlogPosts, post("bim-basics", "BIM", true, "2024-03-15 10:00:00"))
            .unwrap();

        let mut page = BlogPage::new();
        page.load(&store).await;

        let Listing::Items { items } = page.view().posts else {
            panic!("expected posts");
        };
        assert_eq!(items[0].date.as_deref(), Some("Mar 15, 2024"));
        assert_eq!(items[0].read_time, "8 min");
    }

    #[tokio::test]
    async fn test_filtering_and_drafts() {
        let (store, db, _dir) = sqlite_store();
        db.insert(Table::BlogPosts, post("a", "BIM", true, "2024-03-15 10:00:00")).unwrap();
        db.insert(Table::BlogPosts, post("b", "Engineering", true, "2024-03-16 10:00:00"))
            .unwrap();
        db.insert(Table::BlogPosts, post("c", "BIM", false, "2024-03-17 10:00:00")).unwrap();

        let mut page = BlogPage::new();
        page.load(&store).await;
        assert_eq!(page.view().posts.len(), 2);

        assert!(page.select(CategoryFilter::category("BIM")));
        assert_eq!(page.view().posts.len(), 1);

        assert!(page.select(CategoryFilter::category("Career Journey")));
        assert_eq!(page.view().posts, Listing::Empty { message: EMPTY_MESSAGE });

        assert!(!page.select(CategoryFilter::category("Gardening")));
        assert_eq!(page.filter(), &CategoryFilter::category("Career Journey"));
    }
}
