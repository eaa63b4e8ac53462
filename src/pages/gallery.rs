use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::db::{GalleryImage, Store};
use crate::ingest::{persist_gallery_file, DroppedFile, IngestError, GALLERY_DROP_ZONE};
use crate::listing::{category_chips, derived_categories, select_visible, CategoryChip, CategoryFilter, Listing};

pub const EMPTY_MESSAGE: &str = "No images in gallery. Upload some to get started!";

/// Per-file outcome of a gallery drop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub inserted: Vec<String>,
    /// (file, reason) for files the drop zone refused.
    pub rejected: Vec<(String, String)>,
    /// (file, error) for accepted files that did not make it into the store.
    pub failed: Vec<(String, String)>,
}

impl IngestReport {
    pub fn nothing_accepted(&self) -> bool {
        self.inserted.is_empty() && self.failed.is_empty()
    }
}

/// Insert chains started by [`GalleryPage::begin_ingest`].
pub struct PendingIngest {
    chains: JoinSet<(String, Result<(), IngestError>)>,
    report: IngestReport,
}

impl PendingIngest {
    /// Files still being read or inserted.
    pub fn in_flight(&self) -> usize {
        self.chains.len()
    }
}

#[derive(Default)]
pub struct GalleryPage {
    images: Vec<GalleryImage>,
    filter: CategoryFilter,
    uploading: bool,
    selected: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GalleryView {
    pub filter: CategoryFilter,
    pub categories: Vec<CategoryChip>,
    pub uploading: bool,
    pub images: Listing<GalleryImage>,
    pub selected: Option<GalleryImage>,
}

impl GalleryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, store: &Store) {
        match store.gallery_images().await {
            Ok(images) => self.images = images,
            Err(e) => warn!(error = %e, "Failed to load gallery"),
        }
    }

    /// Re-read after a successful insert. The list is only replaced once the
    /// read succeeds, so a failed refresh keeps what is shown.
    async fn refresh(&mut self, store: &Store) {
        match store.gallery_images().await {
            Ok(images) => self.images = images,
            Err(e) => warn!(error = %e, "Failed to refresh gallery after upload"),
        }
    }

    pub fn images(&self) -> &[GalleryImage] {
        &self.images
    }

    pub fn categories(&self) -> Vec<CategoryFilter> {
        derived_categories(&self.images)
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// Switch filters. Only categories present in the current images are selectable.
    pub fn select(&mut self, filter: CategoryFilter) -> bool {
        if !self.categories().contains(&filter) {
            debug!(filter = %filter, "Ignoring unknown gallery category");
            return false;
        }
        self.filter = filter;
        true
    }

    /// Open an image full size.
    pub fn open_image(&mut self, id: &str) -> bool {
        if self.images.iter().any(|img| img.id == id) {
            self.selected = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn close_image(&mut self) {
        self.selected = None;
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// Ingest a drop of files.
    ///
    /// Each accepted file is read, encoded and inserted concurrently with the
    /// others, and the gallery is re-read as each insert lands. A failure ends
    /// only that file's chain. Every file gets the same display order, the
    /// image count at drop time.
    pub async fn ingest(&mut self, store: &Store, files: Vec<DroppedFile>) -> IngestReport {
        let pending = self.begin_ingest(store, files);
        self.finish_ingest(store, pending).await
    }

    /// Screen a drop and start one insert chain per accepted file. The page
    /// reports `uploading` until the returned batch is finished.
    pub fn begin_ingest(&mut self, store: &Store, files: Vec<DroppedFile>) -> PendingIngest {
        let outcome = GALLERY_DROP_ZONE.accept(files);
        let report = IngestReport {
            rejected: outcome
                .rejected
                .iter()
                .map(|r| (r.name().to_string(), r.reason()))
                .collect(),
            ..Default::default()
        };

        let mut chains = JoinSet::new();
        if outcome.accepted.is_empty() {
            return PendingIngest { chains, report };
        }

        self.uploading = true;
        let order = self.images.len() as i64;

        for file in outcome.accepted {
            let store = store.clone();
            chains.spawn(async move {
                let name = file.name.clone();
                let result = persist_gallery_file(&store, file, order).await;
                (name, result)
            });
        }

        PendingIngest { chains, report }
    }

    /// Wait for every chain of a batch, refreshing after each insert.
    pub async fn finish_ingest(&mut self, store: &Store, pending: PendingIngest) -> IngestReport {
        let PendingIngest { mut chains, mut report } = pending;

        while let Some(joined) = chains.join_next().await {
            match joined {
                Ok((name, Ok(()))) => {
                    info!(file = %name, "Added image to gallery");
                    self.refresh(store).await;
                    report.inserted.push(name);
                }
                Ok((name, Err(e))) => {
                    warn!(file = %name, error = %e, "Failed to add image to gallery");
                    report.failed.push((name, e.to_string()));
                }
                Err(e) => {
                    warn!(error = %e, "Gallery upload task failed");
                    report.failed.push(("<unknown>".to_string(), e.to_string()));
                }
            }
        }

        self.uploading = false;
        report
    }

    pub fn view(&self) -> GalleryView {
        let visible = select_visible(&self.images, &self.filter)
            .into_iter()
            .cloned()
            .collect();

        GalleryView {
            filter: self.filter.clone(),
            categories: category_chips(&self.categories(), &self.filter),
            uploading: self.uploading,
            images: Listing::new(visible, EMPTY_MESSAGE),
            selected: self
                .selected
                .as_ref()
                .and_then(|id| self.images.iter().find(|img| &img.id == id))
                .cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::*;
    use crate::db::{Table, UNCATEGORIZED};
    use serde_json::json;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn image(name: &str) -> DroppedFile {
        DroppedFile::from_bytes(name, None, name.as_bytes().to_vec())
    }

    #[tokio::test]
    async fn test_two_uploads_land_uncategorized() {
        let (store, _db, _dir) = sqlite_store();
        let mut page = GalleryPage::new();
        page.load(&store).await;

        let report = page.ingest(&store, vec![image("site.png"), image("crane.jpg")]).await;
        assert_eq!(report.inserted.len(), 2);
        assert!(report.failed.is_empty());
        assert!(!page.is_uploading());

        let mut titles: Vec<&str> = page
            .images()
            .iter()
            .filter_map(|img| img.title.as_deref())
            .collect();
        titles.sort();
        assert_eq!(titles, vec!["crane.jpg", "site.png"]);
        assert!(page.images().iter().all(|img| img.category.as_deref() == Some(UNCATEGORIZED)));
        assert!(page.images().iter().all(|img| img.order == 0));
        assert!(page.images()[0].image_url.starts_with("data:image/"));
    }

    #[tokio::test]
    async fn test_uploading_spans_the_batch() {
        let (store, _db, _dir) = sqlite_store();
        let mut page = GalleryPage::new();
        page.load(&store).await;

        let pending = page.begin_ingest(&store, vec![image("site.png"), image("notes.pdf")]);
        assert_eq!(pending.in_flight(), 1);
        assert!(page.is_uploading());
        assert!(page.view().uploading);

        let report = page.finish_ingest(&store, pending).await;
        assert_eq!(report.inserted, vec!["site.png".to_string()]);
        assert_eq!(report.rejected.len(), 1);
        assert!(!page.view().uploading);
    }

    #[tokio::test]
    async fn test_fully_rejected_drop_never_uploads() {
        let (store, _db, _dir) = sqlite_store();
        let mut page = GalleryPage::new();

        let pending = page.begin_ingest(&store, vec![image("notes.pdf")]);
        assert_eq!(pending.in_flight(), 0);
        assert!(!page.is_uploading());
    }

    #[tokio::test]
    async fn test_order_is_count_at_drop_time() {
        let (store, db, _dir) = sqlite_store();
        for order in 0..3 {
            db.insert(
                Table::GalleryImages,
                json!({ "image_url": "https://example.com/a.png", "order": order }),
            )
            .unwrap();
        }

        let mut page = GalleryPage::new();
        page.load(&store).await;
        page.ingest(&store, vec![image("new.webp")]).await;

        let added = page
            .images()
            .iter()
            .find(|img| img.title.as_deref() == Some("new.webp"))
            .unwrap();
        assert_eq!(added.order, 3);
        assert_eq!(page.images().len(), 4);
    }

    #[tokio::test]
    async fn test_rejected_files_never_reach_the_store() {
        let (store, _db, _dir) = sqlite_store();
        let mut page = GalleryPage::new();

        let report = page.ingest(&store, vec![image("notes.pdf")]).await;
        assert!(report.nothing_accepted());
        assert_eq!(report.rejected.len(), 1);
        assert!(store.gallery_images().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_insert_leaves_list_unchanged() {
        let (_, db, _dir) = sqlite_store();
        db.insert(
            Table::GalleryImages,
            json!({ "image_url": "https://example.com/a.png", "order": 0 }),
        )
        .unwrap();
        let failing = Arc::new(FailingWrites::new(db));
        let store = store_over(failing.clone());

        let mut page = GalleryPage::new();
        page.load(&store).await;
        let report = page.ingest(&store, vec![image("a.png"), image("b.png")]).await;

        assert!(report.inserted.is_empty());
        assert_eq!(report.failed.len(), 2);
        assert_eq!(page.images().len(), 1);
        // No retries.
        assert_eq!(failing.attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_categories_follow_records() {
        let (store, db, _dir) = sqlite_store();
        for (category, order) in [(Some("Site Visits"), 0), (None, 1), (Some("Site Visits"), 2)] {
            db.insert(
                Table::GalleryImages,
                json!({ "image_url": "https://example.com/a.png", "category": category, "order": order }),
            )
            .unwrap();
        }

        let mut page = GalleryPage::new();
        page.load(&store).await;

        let labels: Vec<String> = page.categories().iter().map(|c| c.label().to_string()).collect();
        assert_eq!(labels, vec!["All", "Site Visits", "Uncategorized"]);

        assert!(page.select(CategoryFilter::category(UNCATEGORIZED)));
        assert_eq!(page.view().images.len(), 1);
        assert!(!page.select(CategoryFilter::category("Events")));
    }

    #[tokio::test]
    async fn test_empty_gallery_message() {
        let page = GalleryPage::new();
        assert_eq!(page.view().images, Listing::Empty { message: EMPTY_MESSAGE });
    }

    #[tokio::test]
    async fn test_lightbox_selection() {
        let (store, db, _dir) = sqlite_store();
        db.insert(
            Table::GalleryImages,
            json!({ "image_url": "https://example.com/a.png", "title": "Crane", "order": 0 }),
        )
        .unwrap();

        let mut page = GalleryPage::new();
        page.load(&store).await;
        let id = page.images()[0].id.clone();

        assert!(!page.open_image("missing"));
        assert!(page.open_image(&id));
        assert_eq!(page.view().selected.and_then(|img| img.title).as_deref(), Some("Crane"));

        page.close_image();
        assert!(page.view().selected.is_none());
    }
}
