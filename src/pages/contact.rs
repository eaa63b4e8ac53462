//! Contact form: client-side checks, submission and the resulting notice.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use super::Notice;
use crate::config::{ContactConfig, SiteConfig};
use crate::db::models::looks_like_email;
use crate::db::ContactMessage;

#[derive(Debug, Error)]
pub enum ContactError {
    /// The endpoint answered with a non-success status.
    #[error("contact endpoint returned {status}: {error}")]
    Rejected { status: u16, error: String },

    #[error("contact request failed: {0}")]
    Transport(String),

    #[error("contact request timed out after {0:?}")]
    Timeout(Duration),
}

/// Something that accepts contact submissions.
pub trait ContactEndpoint: Send + Sync {
    fn send(&self, message: &ContactMessage) -> Result<(), ContactError>;
}

/// Posts submissions as JSON to the site's `/api/contact`.
pub struct HttpContactEndpoint {
    url: String,
    agent: ureq::Agent,
}

impl HttpContactEndpoint {
    pub fn new(url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            url: url.to_string(),
            agent,
        }
    }
}

impl ContactEndpoint for HttpContactEndpoint {
    fn send(&self, message: &ContactMessage) -> Result<(), ContactError> {
        match self.agent.post(&self.url).send_json(message) {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(status, response)) => {
                let error = response
                    .into_json::<Value>()
                    .ok()
                    .and_then(|body| body.get("error").and_then(Value::as_str).map(String::from))
                    .unwrap_or_default();
                Err(ContactError::Rejected { status, error })
            }
            Err(ureq::Error::Transport(e)) => Err(ContactError::Transport(e.to_string())),
        }
    }
}

/// Async front for a [`ContactEndpoint`], bounded by a timeout.
#[derive(Clone)]
pub struct ContactClient {
    endpoint: Arc<dyn ContactEndpoint>,
    timeout: Duration,
}

impl ContactClient {
    pub fn new(endpoint: Arc<dyn ContactEndpoint>, timeout: Duration) -> Self {
        Self { endpoint, timeout }
    }

    pub fn from_config(config: &ContactConfig) -> Self {
        let timeout = config.timeout();
        Self::new(Arc::new(HttpContactEndpoint::new(&config.endpoint, timeout)), timeout)
    }

    pub async fn send(&self, message: ContactMessage) -> Result<(), ContactError> {
        let endpoint = Arc::clone(&self.endpoint);
        let task = tokio::task::spawn_blocking(move || endpoint.send(&message));

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(ContactError::Transport(format!("contact task failed: {}", e))),
            Err(_) => Err(ContactError::Timeout(self.timeout)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
    Subject,
    Message,
}

/// Why a submission was not sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Blocked {
    /// A submission is already in flight.
    Busy,
    MissingFields(Vec<&'static str>),
    InvalidEmail,
}

impl fmt::Display for Blocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Blocked::Busy => f.write_str("a message is already being sent"),
            Blocked::MissingFields(fields) => write!(f, "missing {}", fields.join(", ")),
            Blocked::InvalidEmail => f.write_str("email address is not valid"),
        }
    }
}

/// Idle until `begin`, submitting until `complete`, then idle again.
#[derive(Debug, Default)]
pub struct ContactForm {
    fields: ContactMessage,
    submitting: bool,
    notice: Option<Notice>,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: ContactField, value: &str) {
        let slot = match field {
            ContactField::Name => &mut self.fields.name,
            ContactField::Email => &mut self.fields.email,
            ContactField::Subject => &mut self.fields.subject,
            ContactField::Message => &mut self.fields.message,
        };
        *slot = value.to_string();
    }

    pub fn fields(&self) -> &ContactMessage {
        &self.fields
    }

    pub fn submit_enabled(&self) -> bool {
        !self.submitting
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// The checks an email-typed, all-required form enforces before sending.
    pub fn validate(&self) -> Result<(), Blocked> {
        let missing = self.fields.missing_fields();
        if !missing.is_empty() {
            return Err(Blocked::MissingFields(missing));
        }
        if !looks_like_email(&self.fields.email) {
            return Err(Blocked::InvalidEmail);
        }
        Ok(())
    }

    /// Enter the submitting state, returning the message to send.
    pub fn begin(&mut self) -> Result<ContactMessage, Blocked> {
        if self.submitting {
            return Err(Blocked::Busy);
        }
        self.validate()?;

        self.submitting = true;
        self.notice = None;
        Ok(self.fields.clone())
    }

    /// Leave the submitting state. Success clears the fields; failure keeps them.
    pub fn complete(&mut self, result: Result<(), ContactError>) -> Notice {
        self.submitting = false;

        let notice = match result {
            Ok(()) => {
                info!("Contact message sent");
                self.fields = ContactMessage::default();
                Notice::MESSAGE_SENT
            }
            Err(e) => {
                warn!(error = %e, "Failed to send contact message");
                Notice::MESSAGE_FAILED
            }
        };
        self.notice = Some(notice.clone());
        notice
    }

    pub async fn submit(&mut self, client: &ContactClient) -> Result<Notice, Blocked> {
        let message = self.begin()?;
        let result = client.send(message).await;
        Ok(self.complete(result))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactDetail {
    pub title: &'static str,
    pub value: String,
    pub href: Option<String>,
}

/// The owner's published contact channels, skipping unset ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactDetails(pub Vec<ContactDetail>);

impl ContactDetails {
    pub fn from_site(site: &SiteConfig) -> Self {
        let dialable: String = site
            .phone
            .replace("(0)", "")
            .chars()
            .filter(|c| *c == '+' || c.is_ascii_digit())
            .collect();

        let candidates = [
            ("Email", &site.email, Some(format!("mailto:{}", site.email))),
            ("Phone", &site.phone, Some(format!("tel:{}", dialable))),
            ("Location", &site.location, None),
            ("LinkedIn", &site.linkedin, Some(web_link(&site.linkedin))),
            ("GitHub", &site.github, Some(web_link(&site.github))),
        ];

        Self(
            candidates
                .into_iter()
                .filter(|(_, value, _)| !value.is_empty())
                .map(|(title, value, href)| ContactDetail {
                    title,
                    value: value.clone(),
                    href,
                })
                .collect(),
        )
    }
}

fn web_link(value: &str) -> String {
    if value.starts_with("http://") || value.starts_with("https://") {
        value.to_string()
    } else {
        format!("https://{}", value)
    }
}

pub struct ContactPage {
    details: ContactDetails,
    pub form: ContactForm,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactView {
    pub details: ContactDetails,
    pub fields: ContactMessage,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    pub notice: Option<Notice>,
}

impl ContactPage {
    pub fn new(site: &SiteConfig) -> Self {
        Self {
            details: ContactDetails::from_site(site),
            form: ContactForm::new(),
        }
    }

    pub fn view(&self) -> ContactView {
        ContactView {
            details: self.details.clone(),
            fields: self.form.fields().clone(),
            submit_enabled: self.form.submit_enabled(),
            submit_label: if self.form.submit_enabled() {
                "Send Message"
            } else {
                "Sending..."
            },
            notice: self.form.notice().cloned(),
        }
    }
}
