use serde::Serialize;
use tracing::{error, info, warn};

use super::{Avatar, ProjectCard};
use crate::config::SiteConfig;
use crate::content::CORE_COMPETENCIES;
use crate::db::{Profile, Project, Store};
use crate::ingest::{DroppedFile, IngestError, Rejection, AVATAR_DROP_ZONE};

const CARD_TOOLS: usize = 3;

/// Result of an avatar drop that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarUpdate {
    Updated,
    /// No profile is loaded, so there is nothing to update.
    NoProfile,
    Rejected(Vec<Rejection>),
}

pub struct HomePage {
    site: SiteConfig,
    profile: Option<Profile>,
    projects: Vec<Project>,
    editing_avatar: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub site_name: String,
    pub tagline: String,
    pub avatar: Avatar,
    pub editing_avatar: bool,
    pub competencies: &'static [&'static str],
    pub featured: Vec<ProjectCard>,
}

impl HomePage {
    pub fn new(site: SiteConfig) -> Self {
        Self {
            site,
            profile: None,
            projects: Vec::new(),
            editing_avatar: false,
        }
    }

    pub async fn load(&mut self, store: &Store) {
        match store.profile().await {
            Ok(Some(profile)) => self.profile = Some(profile),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Failed to load profile"),
        }

        match store.projects(Some(self.site.featured_projects)).await {
            Ok(projects) => self.projects = projects,
            Err(e) => warn!(error = %e, "Failed to load featured projects"),
        }
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn is_editing_avatar(&self) -> bool {
        self.editing_avatar
    }

    pub fn toggle_avatar_edit(&mut self) {
        self.editing_avatar = !self.editing_avatar;
    }

    /// Replace the profile picture with a dropped file.
    ///
    /// Local state changes only once the store has accepted the update; on
    /// error the previous avatar and edit mode are kept.
    pub async fn upload_avatar(&mut self, store: &Store, files: Vec<DroppedFile>) -> Result<AvatarUpdate, IngestError> {
        let Some(profile_id) = self.profile.as_ref().map(|p| p.id.clone()) else {
            return Ok(AvatarUpdate::NoProfile);
        };

        let mut outcome = AVATAR_DROP_ZONE.accept(files);
        let Some(file) = outcome.accepted.pop() else {
            return Ok(AvatarUpdate::Rejected(outcome.rejected));
        };

        let name = file.name.clone();
        let avatar_url = file.into_data_uri().await?;

        if let Err(e) = store.update_avatar(&profile_id, &avatar_url).await {
            error!(file = %name, error = %e, "Failed to update avatar");
            return Err(e.into());
        }

        info!(file = %name, "Avatar updated");
        if let Some(profile) = self.profile.as_mut() {
            profile.avatar_url = Some(avatar_url);
        }
        self.editing_avatar = false;
        Ok(AvatarUpdate::Updated)
    }

    pub fn view(&self) -> HomeView {
        HomeView {
            site_name: self.site.name.clone(),
            tagline: self.site.tagline.clone(),
            avatar: Avatar::new(self.profile.as_ref(), &self.site.name),
            editing_avatar: self.editing_avatar,
            competencies: CORE_COMPETENCIES,
            featured: self
                .projects
                .iter()
                .map(|p| ProjectCard::new(p, CARD_TOOLS))
                .collect(),
        }
    }
}
