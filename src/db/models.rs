//! Row types for the site's tables.
//!
//! Optional columns are `Option`; everything else must be present in the
//! remote row or decoding fails.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Category given to gallery images that have none.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// The single site owner profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub excerpt: String,
    pub category: String,
    pub duration: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub publication: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    pub order: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: String,
    /// Inline `data:` URI or a plain URL.
    pub image_url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub order: i64,
    pub created_at: String,
}

impl GalleryImage {
    /// Category used for grouping; absent or empty reads as "Uncategorized".
    pub fn effective_category(&self) -> &str {
        match self.category.as_deref() {
            Some(category) if !category.is_empty() => category,
            _ => UNCATEGORIZED,
        }
    }
}

/// Row written by the gallery upload flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewGalleryImage {
    pub image_url: String,
    pub title: Option<String>,
    pub category: Option<String>,
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Minutes.
    pub read_time: u32,
    pub published: bool,
    pub created_at: String,
}

/// A contact form submission. All four fields are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactMessage {
    pub fn new(name: &str, email: &str, subject: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        }
    }

    /// Names of the fields that are empty, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// Loose `local@domain` shape check, matching what an email input accepts.
pub fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

/// Format a store timestamp as e.g. "Mar 15, 2024".
///
/// Accepts RFC 3339 (hosted store), `YYYY-MM-DD HH:MM:SS` (SQLite) and bare dates.
pub fn display_date(timestamp: &str) -> Option<String> {
    let date = DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(timestamp, "%Y-%m-%d"))
        .ok()?;
    Some(date.format("%b %-d, %Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_effective_category() {
        let mut image = GalleryImage {
            id: "1".to_string(),
            image_url: "data:image/png;base64,AA==".to_string(),
            title: None,
            category: None,
            order: 0,
            created_at: "2024-03-15 10:00:00".to_string(),
        };
        assert_eq!(image.effective_category(), UNCATEGORIZED);

        image.category = Some(String::new());
        assert_eq!(image.effective_category(), UNCATEGORIZED);

        image.category = Some("Site Visits".to_string());
        assert_eq!(image.effective_category(), "Site Visits");
    }

    #[test]
    fn test_missing_fields() {
        let message = ContactMessage::new("Jane", "jane@x.com", "", "hi");
        assert_eq!(message.missing_fields(), vec!["subject"]);
        assert!(!message.is_complete());

        assert_eq!(ContactMessage::default().missing_fields().len(), 4);
        assert!(ContactMessage::new("Jane", "jane@x.com", "Hello", "Hi there").is_complete());
    }

    #[test]
    fn test_looks_like_email() {
        assert!(looks_like_email("jane@x.com"));
        assert!(!looks_like_email("jane"));
        assert!(!looks_like_email("@x.com"));
        assert!(!looks_like_email("jane@"));
        assert!(!looks_like_email("jane doe@x.com"));
        assert!(!looks_like_email("a@b@c"));
    }

    #[test]
    fn test_display_date_formats() {
        assert_eq!(display_date("2024-03-15").as_deref(), Some("Mar 15, 2024"));
        assert_eq!(display_date("2024-03-05 08:30:00").as_deref(), Some("Mar 5, 2024"));
        assert_eq!(
            display_date("2024-02-20T09:15:00.123456+00:00").as_deref(),
            Some("Feb 20, 2024")
        );
        assert_eq!(display_date("last tuesday"), None);
    }

    #[test]
    fn test_project_requires_declared_fields() {
        let row = json!({
            "id": "p1",
            "title": "Health Innovation Campus",
            "slug": "health-campus",
            "description": "d",
            "excerpt": "e",
            "category": "Field Studies",
            "duration": "6 months",
            "order": 1,
            "created_at": "2024-01-01T00:00:00Z"
        });
        let project: Project = serde_json::from_value(row.clone()).unwrap();
        assert!(project.tools.is_empty());
        assert_eq!(project.role, None);

        let mut broken = row;
        broken.as_object_mut().unwrap().remove("slug");
        assert!(serde_json::from_value::<Project>(broken).is_err());
    }
}
