use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{Client, ClientId, OwnerId, Questionnaire};
use super::engine::{recompute, DerivedFields};
use super::migration::{migration_tracking, MigrationTrackingEntry};
use super::reconcile::reconcile;
use super::repository::{ClientRepository, ClientSummaryView, ClientView, RepositoryError};
use super::update::{apply_all, ClientUpdate};

/// Service applying client mutations and reconciling derived attributes
/// against the repository after each of them.
pub struct ClientService<R> {
    repository: Arc<R>,
}

/// What a reconciliation pass did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReconcileOutcome {
    pub derived: DerivedFields,
    pub written: bool,
}

impl<R> ClientService<R>
where
    R: ClientRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Create a client from the new-client template, then apply `updates`.
    pub fn create(
        &self,
        owner: &OwnerId,
        updates: Vec<ClientUpdate>,
    ) -> Result<ClientView, ClientServiceError> {
        let mut client = Client::template(ClientId::generate());
        apply_all(&mut client, updates);
        self.insert_reconciled(owner, client)
    }

    /// Store already-built records, e.g. rows mapped from an import file.
    pub fn import(
        &self,
        owner: &OwnerId,
        clients: Vec<Client>,
    ) -> Result<Vec<ClientView>, ClientServiceError> {
        clients
            .into_iter()
            .map(|client| self.insert_reconciled(owner, client))
            .collect()
    }

    pub fn get(&self, owner: &OwnerId, id: &ClientId) -> Result<ClientView, ClientServiceError> {
        let client = self.fetch_existing(owner, id)?;
        let derived = recompute(&client);
        Ok(ClientView { client, derived })
    }

    pub fn list(&self, owner: &OwnerId) -> Result<Vec<ClientSummaryView>, ClientServiceError> {
        let clients = self.repository.list(owner)?;
        Ok(clients
            .into_iter()
            .map(|client| {
                let derived = recompute(&client);
                ClientView { client, derived }.summary()
            })
            .collect())
    }

    /// Apply field edits, persist the raw record and write back derived values.
    pub fn update(
        &self,
        owner: &OwnerId,
        id: &ClientId,
        updates: Vec<ClientUpdate>,
    ) -> Result<ClientView, ClientServiceError> {
        let mut client = self.fetch_existing(owner, id)?;
        apply_all(&mut client, updates);
        self.repository.save(owner, client.clone())?;

        let outcome = self.write_back(owner, &mut client)?;
        Ok(ClientView {
            client,
            derived: outcome.derived,
        })
    }

    pub fn submit_questionnaire(
        &self,
        owner: &OwnerId,
        id: &ClientId,
        questionnaire: Questionnaire,
    ) -> Result<ClientView, ClientServiceError> {
        let mut client = self.fetch_existing(owner, id)?;
        client.questionnaire = questionnaire.normalized();
        debug!(
            owner = %owner.0,
            client = %id.0,
            answered = client.questionnaire.answered_count(),
            "questionnaire submitted"
        );
        self.repository.save(owner, client.clone())?;

        let outcome = self.write_back(owner, &mut client)?;
        Ok(ClientView {
            client,
            derived: outcome.derived,
        })
    }

    /// Persist a whole edited record, as the auto-save path does. Drafts only
    /// replace existing records; new clients go through `create`.
    pub fn save_draft(
        &self,
        owner: &OwnerId,
        mut client: Client,
    ) -> Result<ReconcileOutcome, ClientServiceError> {
        self.fetch_existing(owner, &client.id)?;
        self.repository.save(owner, client.clone())?;
        self.write_back(owner, &mut client)
    }

    /// Reconcile the stored record without editing it.
    pub fn refresh(
        &self,
        owner: &OwnerId,
        id: &ClientId,
    ) -> Result<ReconcileOutcome, ClientServiceError> {
        let mut client = self.fetch_existing(owner, id)?;
        self.write_back(owner, &mut client)
    }

    pub fn migrations(
        &self,
        owner: &OwnerId,
    ) -> Result<Vec<MigrationTrackingEntry>, ClientServiceError> {
        let clients = self.repository.list(owner)?;
        Ok(migration_tracking(&clients))
    }

    fn fetch_existing(&self, owner: &OwnerId, id: &ClientId) -> Result<Client, ClientServiceError> {
        let client = self
            .repository
            .fetch(owner, id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(client)
    }

    fn insert_reconciled(
        &self,
        owner: &OwnerId,
        mut client: Client,
    ) -> Result<ClientView, ClientServiceError> {
        let reconciliation = reconcile(&client);
        if let Some(patch) = &reconciliation.patch {
            patch.apply_to(&mut client);
        }

        let stored = self.repository.insert(owner, client)?;
        info!(owner = %owner.0, client = %stored.id.0, "client created");
        Ok(ClientView {
            client: stored,
            derived: reconciliation.derived,
        })
    }

    fn write_back(
        &self,
        owner: &OwnerId,
        client: &mut Client,
    ) -> Result<ReconcileOutcome, ClientServiceError> {
        let reconciliation = reconcile(client);

        let Some(patch) = reconciliation.patch else {
            debug!(owner = %owner.0, client = %client.id.0, "derived attributes current");
            return Ok(ReconcileOutcome {
                derived: reconciliation.derived,
                written: false,
            });
        };

        if let Err(err) = self.repository.apply_derived(owner, &client.id, &patch) {
            warn!(
                owner = %owner.0,
                client = %client.id.0,
                error = %err,
                "derived attribute write-back failed"
            );
            return Err(err.into());
        }

        patch.apply_to(client);
        info!(
            owner = %owner.0,
            client = %client.id.0,
            niveau_obligation = %patch.obligations_legales.niveau_obligation.as_deref().unwrap_or_default(),
            maturite = %patch.maturite_digitale,
            cartographie = %patch.cartographie_client,
            "derived attributes written back"
        );

        Ok(ReconcileOutcome {
            derived: reconciliation.derived,
            written: true,
        })
    }
}

/// Error raised by the client service.
#[derive(Debug, thiserror::Error)]
pub enum ClientServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
