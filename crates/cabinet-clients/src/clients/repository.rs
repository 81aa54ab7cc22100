use serde::Serialize;

use super::domain::{Client, ClientId, OwnerId};
use super::engine::DerivedFields;
use super::reconcile::DerivedPatch;

/// Document store holding client records per owning user.
pub trait ClientRepository: Send + Sync {
    fn insert(&self, owner: &OwnerId, client: Client) -> Result<Client, RepositoryError>;
    /// Replace the stored document with `client`.
    fn save(&self, owner: &OwnerId, client: Client) -> Result<(), RepositoryError>;
    fn fetch(&self, owner: &OwnerId, id: &ClientId) -> Result<Option<Client>, RepositoryError>;
    fn list(&self, owner: &OwnerId) -> Result<Vec<Client>, RepositoryError>;
    /// Merge the derived attributes into the stored document.
    fn apply_derived(
        &self,
        owner: &OwnerId,
        id: &ClientId,
        patch: &DerivedPatch,
    ) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Client document together with its freshly derived attributes.
#[derive(Debug, Clone, Serialize)]
pub struct ClientView {
    pub client: Client,
    pub derived: DerivedFields,
}

/// Row of the client list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummaryView {
    pub id: ClientId,
    pub raison_sociale: String,
    pub siren: String,
    pub niveau_obligation: &'static str,
    pub maturite_digitale: &'static str,
    pub cartographie_client: &'static str,
    pub completion_pct: f32,
}

impl ClientView {
    pub fn summary(&self) -> ClientSummaryView {
        ClientSummaryView {
            id: self.client.id.clone(),
            raison_sociale: self.client.raison_sociale.clone(),
            siren: self.client.siren.clone(),
            niveau_obligation: self.derived.obligation_score.level.label(),
            maturite_digitale: self.derived.maturity.level.label(),
            cartographie_client: self.derived.cartographie.label(),
            completion_pct: self.derived.completion_pct,
        }
    }
}
