use serde::Serialize;
use tracing::warn;

use crate::db::{Project, Store};

pub const NOT_FOUND_MESSAGE: &str = "Project not found";
pub const BACK_LINK: &str = "/portfolio";

enum ProjectState {
    Loading,
    Found(Project),
    NotFound,
}

/// Detail page for a single project, addressed by slug.
pub struct ProjectPage {
    slug: String,
    state: ProjectState,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ProjectView {
    Loading,
    Found { project: Project },
    NotFound { message: &'static str, back_link: &'static str },
}

impl ProjectPage {
    pub fn new(slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            state: ProjectState::Loading,
        }
    }

    /// A failed read shows the not-found view rather than loading forever.
    pub async fn load(&mut self, store: &Store) {
        self.state = match store.project_by_slug(&self.slug).await {
            Ok(Some(project)) => ProjectState::Found(project),
            Ok(None) => ProjectState::NotFound,
            Err(e) => {
                warn!(slug = %self.slug, error = %e, "Failed to load project");
                ProjectState::NotFound
            }
        };
    }

    pub fn is_found(&self) -> bool {
        matches!(self.state, ProjectState::Found(_))
    }

    pub fn view(&self) -> ProjectView {
        match &self.state {
            ProjectState::Loading => ProjectView::Loading,
            ProjectState::Found(project) => ProjectView::Found {
                project: project.clone(),
            },
            ProjectState::NotFound => ProjectView::NotFound {
                message: NOT_FOUND_MESSAGE,
                back_link: BACK_LINK,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::*;
    use crate::db::Table;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_lifecycle() {
        let (store, db, _dir) = sqlite_store();
        db.insert(Table::Projects, project_row("bridge", "Academic", 0)).unwrap();

        let mut page = ProjectPage::new("bridge");
        assert!(matches!(page.view(), ProjectView::Loading));

        page.load(&store).await;
        assert!(page.is_found());
        let ProjectView::Found { project } = page.view() else {
            panic!("expected project");
        };
        assert_eq!(project.tools.len(), 5);
    }

    #[tokio::test]
    async fn test_unknown_slug() {
        let (store, _db, _dir) = sqlite_store();
        let mut page = ProjectPage::new("nowhere");
        page.load(&store).await;

        assert_eq!(
            serde_json::to_value(page.view()).unwrap(),
            serde_json::json!({
                "state": "not_found",
                "message": "Project not found",
                "back_link": "/portfolio"
            })
        );
    }

    #[tokio::test]
    async fn test_store_failure_reads_as_not_found() {
        let store = store_over(Arc::new(Unreachable));
        let mut page = ProjectPage::new("bridge");
        page.load(&store).await;
        assert!(matches!(page.view(), ProjectView::NotFound { .. }));
    }
}
