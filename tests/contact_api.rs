//! The contact form talking to a live server over HTTP.

use std::sync::Arc;
use std::time::Duration;

use folio::config::SiteConfig;
use folio::db::{ContactMessage, Query, RecordStore, SqliteStore, Store, Table};
use folio::pages::{ContactClient, ContactEndpoint, ContactError, ContactField, ContactForm, HttpContactEndpoint, Notice};
use folio::server::{build_router, AppState};
use tokio::net::TcpListener;

async fn spawn_server() -> (String, Arc<SqliteStore>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db = Arc::new(SqliteStore::open(&dir.path().join("folio.db")).unwrap());
    db.initialize().unwrap();

    let backend: Arc<dyn RecordStore> = db.clone();
    let state = AppState::new(
        Store::new(backend, Duration::from_secs(5)),
        SiteConfig::default(),
        1024 * 1024,
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });

    (format!("http://{}/api/contact", addr), db, dir)
}

#[tokio::test(flavor = "multi_thread")]
async fn form_submission_round_trip() {
    let (url, db, _dir) = spawn_server().await;
    let endpoint = Arc::new(HttpContactEndpoint::new(&url, Duration::from_secs(5)));
    let client = ContactClient::new(endpoint, Duration::from_secs(5));

    let mut form = ContactForm::new();
    form.set(ContactField::Name, "Jane");
    form.set(ContactField::Email, "jane@x.com");
    form.set(ContactField::Subject, "Site visit");
    form.set(ContactField::Message, "Could we talk about the campus project?");

    let notice = form.submit(&client).await.unwrap();
    assert_eq!(notice, Notice::MESSAGE_SENT);
    assert_eq!(form.fields(), &ContactMessage::default());

    let rows = db.select(&Query::from(Table::ContactMessages)).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["subject"], "Site visit");
}

#[tokio::test(flavor = "multi_thread")]
async fn server_rejection_carries_error_text() {
    let (url, db, _dir) = spawn_server().await;
    let endpoint = HttpContactEndpoint::new(&url, Duration::from_secs(5));

    // Bypass the form's own checks to reach the server's validation.
    let message = ContactMessage::new("Jane", "jane@x.com", "", "Hi");
    let result = tokio::task::spawn_blocking(move || endpoint.send(&message))
        .await
        .unwrap();

    match result {
        Err(ContactError::Rejected { status, error }) => {
            assert_eq!(status, 400);
            assert_eq!(error, "All fields are required");
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    assert!(db.select(&Query::from(Table::ContactMessages)).unwrap().is_empty());
}
