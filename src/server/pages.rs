//! Read-only page views.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use super::AppState;
use crate::listing::{CategoryFilter, BLOG_CATEGORIES, PORTFOLIO_CATEGORIES};
use crate::pages::{
    AboutPage, AboutView, BlogPage, BlogView, ContactPage, ContactView, GalleryPage, GalleryView, HomePage, HomeView,
    PortfolioPage, PortfolioView, ProjectPage,
};

/// `?category=` on listing pages. Absent means every category.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct CategoryQuery {
    category: Option<String>,
}

impl CategoryQuery {
    fn filter(self) -> CategoryFilter {
        CategoryFilter::from_query(self.category)
    }

    /// "All" selects everything on pages whose categories are fixed.
    fn fixed_filter(self, categories: &[&str]) -> CategoryFilter {
        CategoryFilter::from_fixed_query(self.category, categories)
    }
}

pub(crate) async fn home(State(state): State<AppState>) -> Json<HomeView> {
    let mut page = HomePage::new(state.site.as_ref().clone());
    page.load(&state.store).await;
    Json(page.view())
}

pub(crate) async fn about(State(state): State<AppState>) -> Json<AboutView> {
    let mut page = AboutPage::new(state.site.as_ref().clone());
    page.load(&state.store).await;
    Json(page.view())
}

pub(crate) async fn portfolio(State(state): State<AppState>, Query(query): Query<CategoryQuery>) -> Json<PortfolioView> {
    let mut page = PortfolioPage::new();
    page.load(&state.store).await;
    page.select(query.fixed_filter(PORTFOLIO_CATEGORIES));
    Json(page.view())
}

pub(crate) async fn project(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let mut page = ProjectPage::new(&slug);
    page.load(&state.store).await;

    let status = if page.is_found() {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    (status, Json(page.view())).into_response()
}

pub(crate) async fn blog(State(state): State<AppState>, Query(query): Query<CategoryQuery>) -> Json<BlogView> {
    let mut page = BlogPage::new();
    page.load(&state.store).await;
    page.select(query.fixed_filter(BLOG_CATEGORIES));
    Json(page.view())
}

pub(crate) async fn gallery(State(state): State<AppState>, Query(query): Query<CategoryQuery>) -> Json<GalleryView> {
    let mut page = GalleryPage::new();
    page.load(&state.store).await;
    page.select(query.filter());
    Json(page.view())
}

pub(crate) async fn contact(State(state): State<AppState>) -> Json<ContactView> {
    Json(ContactPage::new(&state.site).view())
}
