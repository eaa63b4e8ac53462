//! Record store backend abstraction.
//!
//! Backends speak rows as JSON objects so the hosted REST store and the local
//! SQLite store can share one contract. Typed decoding happens in the async
//! [`Store`](super::Store) facade.

use serde_json::Value;

use super::StoreError;

/// Tables the site reads from or writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Profile,
    Projects,
    GalleryImages,
    ContactMessages,
    BlogPosts,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Profile => "profile",
            Table::Projects => "projects",
            Table::GalleryImages => "gallery_images",
            Table::ContactMessages => "contact_messages",
            Table::BlogPosts => "blog_posts",
        }
    }

    /// Columns a query may filter, order or write on.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Table::Profile => &[
                "id", "name", "avatar_url", "email", "phone", "linkedin", "github", "location",
                "bio", "updated_at",
            ],
            Table::Projects => &[
                "id", "title", "slug", "description", "excerpt", "category", "duration", "role",
                "tools", "image_url", "publication", "achievements", "order", "created_at",
            ],
            Table::GalleryImages => &["id", "image_url", "title", "category", "order", "created_at"],
            Table::ContactMessages => &["id", "name", "email", "subject", "message", "created_at"],
            Table::BlogPosts => &[
                "id", "title", "slug", "excerpt", "content", "category", "image_url", "read_time",
                "published", "created_at",
            ],
        }
    }

    /// Columns holding JSON arrays of strings.
    pub fn array_columns(&self) -> &'static [&'static str] {
        match self {
            Table::Projects => &["tools", "achievements"],
            _ => &[],
        }
    }

    /// Columns holding booleans.
    pub fn bool_columns(&self) -> &'static [&'static str] {
        match self {
            Table::BlogPosts => &["published"],
            _ => &[],
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns().contains(&column)
    }

    pub(crate) fn check_column(&self, column: &str) -> Result<(), StoreError> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(StoreError::UnknownColumn {
                table: self.name(),
                column: column.to_string(),
            })
        }
    }
}

/// Equality filter on one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// A select over one table: equality filters, ordering, optional limit.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: Table,
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn from(table: Table) -> Self {
        Self {
            table,
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            column: column.to_string(),
            value: value.into(),
        });
        self
    }

    /// Appends an ordering key; earlier keys take precedence.
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order.push(Order {
            column: column.to_string(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn validate(&self) -> Result<(), StoreError> {
        for filter in &self.filters {
            self.table.check_column(&filter.column)?;
        }
        for order in &self.order {
            self.table.check_column(&order.column)?;
        }
        Ok(())
    }
}

/// Trait for record store implementations.
///
/// Calls block; the async facade moves them onto the blocking pool.
pub trait RecordStore: Send + Sync {
    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;

    /// Run a select and return matching rows as JSON objects.
    fn select(&self, query: &Query) -> Result<Vec<Value>, StoreError>;

    /// Insert one row. Server-assigned fields (id, timestamps) are filled by the store.
    fn insert(&self, table: Table, row: Value) -> Result<(), StoreError>;

    /// Apply `changes` to every row matching `filter`.
    fn update(&self, table: Table, filter: &Filter, changes: Value) -> Result<(), StoreError>;
}
