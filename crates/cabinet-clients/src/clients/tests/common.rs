use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::clients::domain::{Client, ClientId, OwnerId, Questionnaire, MIGRATION_ACTION};
use crate::clients::reconcile::DerivedPatch;
use crate::clients::repository::{ClientRepository, RepositoryError};
use crate::clients::service::ClientService;
use crate::clients::update::ClientUpdate;

pub(super) fn owner() -> OwnerId {
    OwnerId("user-42".to_string())
}

pub(super) fn smith_updates() -> Vec<ClientUpdate> {
    vec![
        ClientUpdate::SetIdentifiantInterne {
            value: "CLI-001".to_string(),
        },
        ClientUpdate::SetRaisonSociale {
            value: "Smith Enterprises".to_string(),
        },
        ClientUpdate::SetSiren {
            value: "123456789".to_string(),
        },
        ClientUpdate::SetCollaborateurReferent {
            value: "Claire Dubois".to_string(),
        },
    ]
}

/// Answers as posted by the questionnaire form, before normalization.
pub(super) fn form_questionnaire() -> Questionnaire {
    Questionnaire {
        q1: Some("detailed".to_string()),
        q2: Some("quickly".to_string()),
        q3: Some("b2b".to_string()),
        q4: Some("yes".to_string()),
        q4_software: Some("Pennylane".to_string()),
        q5: Some("yes".to_string()),
        q6: Some("yes".to_string()),
        q7: Some("no".to_string()),
        q8: Some("yes".to_string()),
        q9: Some("digital".to_string()),
        q10: Some("no".to_string()),
        q11: Some("paper".to_string()),
        q12: Some("no".to_string()),
        q13: Some("no".to_string()),
        ..Questionnaire::default()
    }
}

pub(super) fn migration_client(id: &str) -> Client {
    let mut client = Client::template(ClientId(id.to_string()));
    client.raison_sociale = format!("Migration {id}");
    client.actions_a_mener = vec![MIGRATION_ACTION.to_string()];
    client
}

pub(super) fn build_service() -> (ClientService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = ClientService::new(repository.clone());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<(OwnerId, ClientId), Client>>>,
    saves: Arc<AtomicUsize>,
    patches: Arc<AtomicUsize>,
}

impl MemoryRepository {
    pub(super) fn stored(&self, owner: &OwnerId, id: &ClientId) -> Option<Client> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(&(owner.clone(), id.clone()))
            .cloned()
    }

    pub(super) fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub(super) fn patches(&self) -> usize {
        self.patches.load(Ordering::SeqCst)
    }
}

impl ClientRepository for MemoryRepository {
    fn insert(&self, owner: &OwnerId, client: Client) -> Result<Client, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let key = (owner.clone(), client.id.clone());
        if guard.contains_key(&key) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(key, client.clone());
        Ok(client)
    }

    fn save(&self, owner: &OwnerId, client: Client) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert((owner.clone(), client.id.clone()), client);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn fetch(&self, owner: &OwnerId, id: &ClientId) -> Result<Option<Client>, RepositoryError> {
        Ok(self.stored(owner, id))
    }

    fn list(&self, owner: &OwnerId) -> Result<Vec<Client>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut clients: Vec<Client> = guard
            .iter()
            .filter(|((record_owner, _), _)| record_owner == owner)
            .map(|(_, client)| client.clone())
            .collect();
        clients.sort_by(|left, right| left.id.cmp(&right.id));
        Ok(clients)
    }

    fn apply_derived(
        &self,
        owner: &OwnerId,
        id: &ClientId,
        patch: &DerivedPatch,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let client = guard
            .get_mut(&(owner.clone(), id.clone()))
            .ok_or(RepositoryError::NotFound)?;
        patch.apply_to(client);
        self.patches.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Accepts raw saves but refuses every derived write-back.
#[derive(Default, Clone)]
pub(super) struct PatchFailingRepository {
    pub(super) inner: MemoryRepository,
}

impl ClientRepository for PatchFailingRepository {
    fn insert(&self, owner: &OwnerId, client: Client) -> Result<Client, RepositoryError> {
        self.inner.insert(owner, client)
    }

    fn save(&self, owner: &OwnerId, client: Client) -> Result<(), RepositoryError> {
        self.inner.save(owner, client)
    }

    fn fetch(&self, owner: &OwnerId, id: &ClientId) -> Result<Option<Client>, RepositoryError> {
        self.inner.fetch(owner, id)
    }

    fn list(&self, owner: &OwnerId) -> Result<Vec<Client>, RepositoryError> {
        self.inner.list(owner)
    }

    fn apply_derived(
        &self,
        _owner: &OwnerId,
        _id: &ClientId,
        _patch: &DerivedPatch,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("write quota exceeded".to_string()))
    }
}

pub(super) struct ConflictRepository;

impl ClientRepository for ConflictRepository {
    fn insert(&self, _owner: &OwnerId, _client: Client) -> Result<Client, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn save(&self, _owner: &OwnerId, _client: Client) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _owner: &OwnerId, _id: &ClientId) -> Result<Option<Client>, RepositoryError> {
        Ok(None)
    }

    fn list(&self, _owner: &OwnerId) -> Result<Vec<Client>, RepositoryError> {
        Ok(Vec::new())
    }

    fn apply_derived(
        &self,
        _owner: &OwnerId,
        _id: &ClientId,
        _patch: &DerivedPatch,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl ClientRepository for UnavailableRepository {
    fn insert(&self, _owner: &OwnerId, _client: Client) -> Result<Client, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn save(&self, _owner: &OwnerId, _client: Client) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _owner: &OwnerId, _id: &ClientId) -> Result<Option<Client>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _owner: &OwnerId) -> Result<Vec<Client>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn apply_derived(
        &self,
        _owner: &OwnerId,
        _id: &ClientId,
        _patch: &DerivedPatch,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
