mod schema;
pub mod backend;
pub mod models;
pub mod rest;
pub mod sqlite;

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub use backend::{Filter, Order, Query, RecordStore, Table};
pub use models::{BlogPost, ContactMessage, GalleryImage, NewGalleryImage, Profile, Project, UNCATEGORIZED};
pub use rest::RestStore;
pub use sqlite::SqliteStore;

use crate::config::{StoreBackendType, StoreConfig};

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store answered with a non-success status.
    #[error("store returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("store request failed: {0}")]
    Transport(String),

    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    #[error("unexpected row shape in {table}: {message}")]
    Decode { table: &'static str, message: String },

    #[error("{table} has no column {column}")]
    UnknownColumn { table: &'static str, column: String },

    #[error("expected at most one row from {table}, got {count}")]
    NotUnique { table: &'static str, count: usize },

    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Open the backend selected in the configuration.
pub fn open_backend(config: &StoreConfig) -> anyhow::Result<Arc<dyn RecordStore>> {
    let backend: Arc<dyn RecordStore> = match config.backend {
        StoreBackendType::Rest => Arc::new(RestStore::new(&config.url, &config.api_key, config.timeout())),
        StoreBackendType::Sqlite => {
            let db = SqliteStore::open(&config.sqlite_path)?;
            db.initialize()?;
            Arc::new(db)
        }
    };
    Ok(backend)
}

/// Async, typed access to the record store.
///
/// Every call runs on the blocking pool and is bounded by `timeout`; an
/// expired call surfaces as [`StoreError::Timeout`].
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn RecordStore>,
    timeout: Duration,
}

impl Store {
    pub fn new(backend: Arc<dyn RecordStore>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    async fn run<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn RecordStore) -> Result<T, StoreError> + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let task = tokio::task::spawn_blocking(move || op(backend.as_ref()));

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(StoreError::Transport(format!("store task failed: {}", e))),
            Err(_) => Err(StoreError::Timeout(self.timeout)),
        }
    }

    async fn select<T: DeserializeOwned + Send + 'static>(&self, query: Query) -> Result<Vec<T>, StoreError> {
        let table = query.table;
        let rows = self.run(move |store| store.select(&query)).await?;
        decode_rows(table, rows)
    }

    async fn select_at_most_one<T: DeserializeOwned + Send + 'static>(
        &self,
        query: Query,
    ) -> Result<Option<T>, StoreError> {
        let table = query.table;
        let mut rows: Vec<T> = self.select(query.limit(2)).await?;
        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            count => Err(StoreError::NotUnique {
                table: table.name(),
                count,
            }),
        }
    }

    async fn insert<R: serde::Serialize>(&self, table: Table, row: &R) -> Result<(), StoreError> {
        let row = serde_json::to_value(row).map_err(|e| StoreError::Decode {
            table: table.name(),
            message: e.to_string(),
        })?;
        self.run(move |store| store.insert(table, row)).await
    }

    pub async fn profile(&self) -> Result<Option<Profile>, StoreError> {
        self.select_at_most_one(Query::from(Table::Profile)).await
    }

    /// Projects by display order, ties in insertion order.
    pub async fn projects(&self, limit: Option<usize>) -> Result<Vec<Project>, StoreError> {
        let mut query = Query::from(Table::Projects)
            .order("order", true)
            .order("created_at", true);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        self.select(query).await
    }

    pub async fn project_by_slug(&self, slug: &str) -> Result<Option<Project>, StoreError> {
        self.select_at_most_one(Query::from(Table::Projects).eq("slug", slug))
            .await
    }

    pub async fn gallery_images(&self) -> Result<Vec<GalleryImage>, StoreError> {
        let query = Query::from(Table::GalleryImages)
            .order("order", true)
            .order("created_at", true);
        self.select(query).await
    }

    pub async fn insert_gallery_image(&self, image: &NewGalleryImage) -> Result<(), StoreError> {
        self.insert(Table::GalleryImages, image).await
    }

    pub async fn update_avatar(&self, profile_id: &str, avatar_url: &str) -> Result<(), StoreError> {
        let filter = Filter {
            column: "id".to_string(),
            value: Value::String(profile_id.to_string()),
        };
        let changes = serde_json::json!({ "avatar_url": avatar_url });
        self.run(move |store| store.update(Table::Profile, &filter, changes))
            .await
    }

    pub async fn insert_contact_message(&self, message: &ContactMessage) -> Result<(), StoreError> {
        self.insert(Table::ContactMessages, message).await
    }

    /// Published posts, newest first.
    pub async fn published_posts(&self) -> Result<Vec<BlogPost>, StoreError> {
        let query = Query::from(Table::BlogPosts)
            .eq("published", true)
            .order("created_at", false);
        self.select(query).await
    }
}

fn decode_rows<T: DeserializeOwned>(table: Table, rows: Vec<Value>) -> Result<Vec<T>, StoreError> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(row).map_err(|e| StoreError::Decode {
                table: table.name(),
                message: e.to_string(),
            })
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[tokio::test]
    async fn test_projects_sorted_by_order_then_insertion() {
        let (store, db, _dir) = sqlite_store();
        db.insert(Table::Projects, project_row("third", "Academic", 2)).unwrap();
        db.insert(Table::Projects, project_row("first", "Academic", 1)).unwrap();
        db.insert(Table::Projects, project_row("second", "Field Studies", 1)).unwrap();

        let slugs: Vec<String> = store
            .projects(None)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["first", "second", "third"]);

        let featured = store.projects(Some(2)).await.unwrap();
        assert_eq!(featured.len(), 2);
    }

    #[tokio::test]
    async fn test_project_by_slug() {
        let (store, db, _dir) = sqlite_store();
        db.insert(Table::Projects, project_row("bridge", "Academic", 0)).unwrap();

        let found = store.project_by_slug("bridge").await.unwrap().unwrap();
        assert_eq!(found.tools.len(), 5);
        assert_eq!(found.achievements, vec!["Delivered on time"]);

        assert!(store.project_by_slug("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_second_profile_row_is_a_contract_violation() {
        let (store, db, _dir) = sqlite_store();
        assert!(store.profile().await.unwrap().is_none());

        db.insert(Table::Profile, profile_row("Cellia")).unwrap();
        assert_eq!(store.profile().await.unwrap().unwrap().name, "Cellia");

        db.insert(Table::Profile, profile_row("Other")).unwrap();
        assert!(matches!(
            store.profile().await,
            Err(StoreError::NotUnique { table: "profile", count: 2 })
        ));
    }

    #[tokio::test]
    async fn test_update_avatar() {
        let (store, db, _dir) = sqlite_store();
        db.insert(Table::Profile, profile_row("Cellia")).unwrap();
        let profile = store.profile().await.unwrap().unwrap();

        store
            .update_avatar(&profile.id, "data:image/png;base64,AAAA")
            .await
            .unwrap();

        let updated = store.profile().await.unwrap().unwrap();
        assert_eq!(updated.avatar_url.as_deref(), Some("data:image/png;base64,AAAA"));
    }

    #[tokio::test]
    async fn test_only_published_posts_newest_first() {
        let (store, db, _dir) = sqlite_store();
        for (slug, published, created_at) in [
            ("old", true, "2024-02-10 09:00:00"),
            ("draft", false, "2024-03-20 09:00:00"),
            ("new", true, "2024-03-15 09:00:00"),
        ] {
            db.insert(
                Table::BlogPosts,
                serde_json::json!({
                    "title": slug,
                    "slug": slug,
                    "excerpt": "e",
                    "content": "c",
                    "category": "BIM",
                    "read_time": 5,
                    "published": published,
                    "created_at": created_at,
                }),
            )
            .unwrap();
        }

        let slugs: Vec<String> = store
            .published_posts()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_malformed_rows_fail_decoding() {
        let (store, db, _dir) = sqlite_store();
        db.insert(
            Table::GalleryImages,
            serde_json::json!({ "image_url": "data:image/png;base64,AA==", "order": 0 }),
        )
        .unwrap();
        // SQLite keeps non-numeric text in an INTEGER column.
        db.conn()
            .execute(
                "INSERT INTO gallery_images (image_url, \"order\") VALUES ('x', 'first')",
                [],
            )
            .unwrap();

        assert!(matches!(
            store.gallery_images().await,
            Err(StoreError::Decode { table: "gallery_images", .. })
        ));
    }

    #[tokio::test]
    async fn test_hung_backend_times_out() {
        let store = Store::new(Arc::new(Hanging), Duration::from_millis(50));
        assert!(matches!(store.gallery_images().await, Err(StoreError::Timeout(_))));
    }
}
