use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::put,
    Router,
};
use serde_json::json;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::domain::{Client, ClientId, OwnerId};
use super::repository::ClientRepository;
use super::service::ClientService;

type DraftKey = (OwnerId, ClientId);

struct PendingDraft {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Debounced persistence of client drafts.
///
/// Each scheduled snapshot replaces the pending one for the same client; the
/// latest snapshot is saved and reconciled once `debounce` has elapsed without
/// a newer edit. Failed writes are logged and dropped.
pub struct AutoSaver<R> {
    service: Arc<ClientService<R>>,
    debounce: Duration,
    pending: Arc<Mutex<HashMap<DraftKey, PendingDraft>>>,
    generation: AtomicU64,
}

impl<R> AutoSaver<R>
where
    R: ClientRepository + 'static,
{
    pub fn new(service: Arc<ClientService<R>>, debounce: Duration) -> Self {
        Self {
            service,
            debounce,
            pending: Arc::new(Mutex::new(HashMap::new())),
            generation: AtomicU64::new(0),
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Queue `client` for saving. Must be called from within a tokio runtime.
    pub fn schedule(&self, owner: OwnerId, client: Client) {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let key = (owner.clone(), client.id.clone());

        let service = self.service.clone();
        let pending = self.pending.clone();
        let debounce = self.debounce;
        let task_key = key.clone();

        let mut guard = self.pending.lock().expect("autosave mutex poisoned");
        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;

            let client_id = client.id.clone();
            match service.save_draft(&owner, client) {
                Ok(outcome) => info!(
                    owner = %owner.0,
                    client = %client_id.0,
                    written = outcome.written,
                    "draft auto-saved"
                ),
                Err(err) => warn!(
                    owner = %owner.0,
                    client = %client_id.0,
                    error = %err,
                    "draft auto-save failed"
                ),
            }

            let mut guard = pending.lock().expect("autosave mutex poisoned");
            if guard
                .get(&task_key)
                .is_some_and(|entry| entry.generation == generation)
            {
                guard.remove(&task_key);
            }
        });

        let (owner, client_id) = (key.0 .0.clone(), key.1 .0.clone());
        if let Some(previous) = guard.insert(key, PendingDraft { generation, handle }) {
            previous.handle.abort();
            debug!(owner = %owner, client = %client_id, "superseded pending draft");
        }
    }

    /// Discard the pending write for a client, if any.
    pub fn cancel(&self, owner: &OwnerId, id: &ClientId) -> bool {
        let mut guard = self.pending.lock().expect("autosave mutex poisoned");
        match guard.remove(&(owner.clone(), id.clone())) {
            Some(entry) => {
                entry.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Number of clients with a write still waiting on the debounce delay.
    pub fn pending(&self) -> usize {
        self.pending.lock().expect("autosave mutex poisoned").len()
    }
}

impl<R> Drop for AutoSaver<R> {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.pending.lock() {
            for (_, entry) in guard.drain() {
                entry.handle.abort();
            }
        }
    }
}

/// Router accepting draft snapshots for debounced saving.
pub fn draft_router<R>(saver: Arc<AutoSaver<R>>) -> Router
where
    R: ClientRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/users/:owner_id/clients/:client_id/draft",
            put(draft_handler::<R>),
        )
        .with_state(saver)
}

pub(crate) async fn draft_handler<R>(
    State(saver): State<Arc<AutoSaver<R>>>,
    Path((owner_id, client_id)): Path<(String, String)>,
    axum::Json(mut client): axum::Json<Client>,
) -> Response
where
    R: ClientRepository + 'static,
{
    client.id = ClientId(client_id);
    let payload = json!({
        "clientId": client.id.0,
        "debounceMs": saver.debounce().as_millis() as u64,
    });
    saver.schedule(OwnerId(owner_id), client);
    (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
}
