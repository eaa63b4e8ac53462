//! Per-page controllers.
//!
//! Each controller owns its state, starts empty and fills itself in `load`.
//! Read failures are logged and leave whatever was already shown. Views are
//! plain serializable snapshots of the state.

pub mod about;
pub mod blog;
pub mod contact;
pub mod gallery;
pub mod home;
pub mod portfolio;
pub mod project;

pub use about::{AboutPage, AboutView};
pub use blog::{BlogCard, BlogPage, BlogView};
pub use contact::{
    Blocked, ContactClient, ContactDetail, ContactDetails, ContactEndpoint, ContactError, ContactField, ContactForm,
    ContactPage, ContactView, HttpContactEndpoint,
};
pub use gallery::{GalleryPage, GalleryView, IngestReport, PendingIngest};
pub use home::{AvatarUpdate, HomePage, HomeView};
pub use portfolio::{PortfolioPage, PortfolioView};
pub use project::{ProjectPage, ProjectView};

use serde::Serialize;

use crate::db::{Profile, Project};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient message shown after a write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: &'static str,
    pub description: &'static str,
    pub kind: NoticeKind,
}

impl Notice {
    pub const MESSAGE_SENT: Notice = Notice {
        title: "Message sent!",
        description: "Thank you for reaching out. I will get back to you soon.",
        kind: NoticeKind::Success,
    };

    pub const MESSAGE_FAILED: Notice = Notice {
        title: "Error",
        description: "Failed to send message. Please try again.",
        kind: NoticeKind::Error,
    };

    pub const AVATAR_UPDATED: Notice = Notice {
        title: "Avatar updated",
        description: "Your new profile picture is live.",
        kind: NoticeKind::Success,
    };

    pub const AVATAR_FAILED: Notice = Notice {
        title: "Error",
        description: "Failed to update avatar. Please try again.",
        kind: NoticeKind::Error,
    };
}

/// The profile picture, or the letter shown in its place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Avatar {
    pub image_url: Option<String>,
    pub initial: String,
}

impl Avatar {
    pub fn new(profile: Option<&Profile>, site_name: &str) -> Self {
        let name = profile.map(|p| p.name.as_str()).filter(|n| !n.is_empty()).unwrap_or(site_name);
        let initial: String = name.chars().next().map(|c| c.to_uppercase().collect()).unwrap_or_default();

        Self {
            image_url: profile.and_then(|p| p.avatar_url.clone()),
            initial,
        }
    }
}

/// Project summary as shown in card grids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectCard {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub category: String,
    pub duration: String,
    pub role: Option<String>,
    pub image_url: Option<String>,
    /// Leading tools only; the detail page lists them all.
    pub tools: Vec<String>,
}

impl ProjectCard {
    pub fn new(project: &Project, max_tools: usize) -> Self {
        Self {
            slug: project.slug.clone(),
            title: project.title.clone(),
            excerpt: project.excerpt.clone(),
            category: project.category.clone(),
            duration: project.duration.clone(),
            role: project.role.clone(),
            image_url: project.image_url.clone(),
            tools: project.tools.iter().take(max_tools).cloned().collect(),
        }
    }
}
