use std::sync::Arc;

use chrono::Duration;
use leadboard::server::{AppState, create_router};
use leadboard::store::{SqliteStore, Store};
use leadboard::types::{Lead, LeadDraft, timestamp_now, validate_new_lead};
use tempfile::TempDir;
use tokio::task::JoinHandle;
use uuid::Uuid;

pub struct TestServer {
    pub temp_dir: TempDir,
    pub base_url: String,
    pub store: Arc<SqliteStore>,
    server_task: Option<JoinHandle<()>>,
}

/// Builds a valid lead; `created_offset` spaces out creation times in seconds.
pub fn lead(name: &str, status: &str, stage: &str, created_offset: i64) -> Lead {
    let draft = LeadDraft {
        name: Some(name.to_string()),
        email: Some(format!("{}@example.com", name.to_lowercase().replace(' ', "."))),
        status: Some(status.to_string()),
        stage: Some(stage.to_string()),
        ..Default::default()
    };
    validate_new_lead(&draft)
        .expect("valid lead")
        .into_lead(
            Uuid::new_v4().to_string(),
            timestamp_now() + Duration::seconds(created_offset),
        )
}

impl TestServer {
    pub async fn start() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let store = SqliteStore::new(temp_dir.path().join("leadboard.db")).expect("open store");
        store.initialize().expect("initialize store");
        let store = Arc::new(store);

        let app = create_router(Arc::new(AppState::new(store.clone())));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let server_task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        Self::wait_for_ready(&base_url).await;

        Self {
            temp_dir,
            base_url,
            store,
            server_task: Some(server_task),
        }
    }

    /// Alice/New/Lead, Bob/Contacted/Prospect, Carol/Converted/Customer.
    pub async fn start_seeded() -> Self {
        let server = Self::start().await;
        server
            .store
            .insert_leads(&[
                lead("Alice", "New", "Lead", 0),
                lead("Bob", "Contacted", "Prospect", 1),
                lead("Carol", "Converted", "Customer", 2),
            ])
            .expect("seed leads");
        server
    }

    async fn wait_for_ready(base_url: &str) {
        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client
                .get(format!("{}/health", base_url))
                .send()
                .await
                .is_ok()
            {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }
        panic!("Server did not become ready");
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(task) = self.server_task.take() {
            task.abort();
        }
    }
}
