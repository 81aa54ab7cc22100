use cabinet_clients::clients::{
    Client, ClientId, ClientRepository, DerivedPatch, OwnerId, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

type DocumentKey = (OwnerId, ClientId);

/// Client documents keyed by owning user, kept in process memory.
#[derive(Default, Clone)]
pub(crate) struct InMemoryClientRepository {
    records: Arc<Mutex<HashMap<DocumentKey, Client>>>,
}

impl ClientRepository for InMemoryClientRepository {
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
        Ok(())
    }

    fn fetch(&self, owner: &OwnerId, id: &ClientId) -> Result<Option<Client>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&(owner.clone(), id.clone())).cloned())
    }

    fn list(&self, owner: &OwnerId) -> Result<Vec<Client>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut clients: Vec<Client> = guard
            .iter()
            .filter(|((record_owner, _), _)| record_owner == owner)
            .map(|(_, client)| client.clone())
            .collect();
        clients.sort_by(|left, right| left.raison_sociale.cmp(&right.raison_sociale));
        Ok(clients)
    }

    fn apply_derived(
        &self,
        owner: &OwnerId,
        id: &ClientId,
        patch: &DerivedPatch,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.get_mut(&(owner.clone(), id.clone())) {
            Some(client) => {
                patch.apply_to(client);
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}
