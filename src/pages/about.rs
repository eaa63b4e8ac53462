use serde::Serialize;
use tracing::warn;

use super::Avatar;
use crate::config::SiteConfig;
use crate::content::{Award, Education, SkillGroup, AWARDS, DEFAULT_BIO, EDUCATION, SKILL_GROUPS};
use crate::db::{Profile, Store};

pub struct AboutPage {
    site: SiteConfig,
    profile: Option<Profile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AboutView {
    pub avatar: Avatar,
    pub bio: String,
    pub education: &'static [Education],
    pub skills: &'static [SkillGroup],
    pub awards: &'static [Award],
}

impl AboutPage {
    pub fn new(site: SiteConfig) -> Self {
        Self { site, profile: None }
    }

    pub async fn load(&mut self, store: &Store) {
        match store.profile().await {
            Ok(Some(profile)) => self.profile = Some(profile),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Failed to load profile"),
        }
    }

    pub fn view(&self) -> AboutView {
        let bio = self
            .profile
            .as_ref()
            .and_then(|p| p.bio.as_deref())
            .filter(|bio| !bio.trim().is_empty())
            .unwrap_or(DEFAULT_BIO);

        AboutView {
            avatar: Avatar::new(self.profile.as_ref(), &self.site.name),
            bio: bio.to_string(),
            education: EDUCATION,
            skills: SKILL_GROUPS,
            awards: AWARDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::*;
    use crate::db::Table;

    #[tokio::test]
    async fn test_bio_falls_back_to_default() {
        let (store, db, _dir) = sqlite_store();
        db.insert(Table::Profile, profile_row("Cellia")).unwrap();

        let mut page = AboutPage::new(SiteConfig::default());
        page.load(&store).await;
        let view = page.view();

        assert_eq!(view.bio, DEFAULT_BIO);
        assert_eq!(view.education.len(), 3);
        assert_eq!(view.skills.len(), 3);
        assert_eq!(view.awards.len(), 4);
    }

    #[tokio::test]
    async fn test_stored_bio_is_shown() {
        let (store, db, _dir) = sqlite_store();
        let mut row = profile_row("Cellia");
        row["bio"] = serde_json::json!("Site engineer turned planner.");
        db.insert(Table::Profile, row).unwrap();

        let mut page = AboutPage::new(SiteConfig::default());
        page.load(&store).await;
        assert_eq!(page.view().bio, "Site engineer turned planner.");
    }
}
