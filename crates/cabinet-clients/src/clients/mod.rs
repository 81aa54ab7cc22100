//! Accounting-firm client records and the attributes derived from them.
//!
//! Raw fields are edited through [`ClientUpdate`]s or questionnaire
//! submissions; after each edit the service recomputes obligations, maturity,
//! cartography and completion and writes back only what changed.

pub mod autosave;
pub mod domain;
pub mod engine;
pub mod import;
pub mod migration;
pub mod reconcile;
pub mod repository;
pub mod router;
pub mod service;
pub mod tools;
pub mod update;

#[cfg(test)]
mod tests;

pub use autosave::{draft_router, AutoSaver};
pub use domain::{
    Activites, Cartographie, Client, ClientId, ContactPrincipal, MaturityLevel, MissionsActuelles,
    ObligationFlag, ObligationLevel, ObligationsLegales, OwnerId, Questionnaire, RegimeTva,
    TypologieClientele, MIGRATION_ACTION, UNDEFINED_LABEL,
};
pub use engine::{recompute, DerivedFields, MaturityScore, ObligationFlags, ObligationScore};
pub use import::{ClientCsvImporter, ClientImport, ClientImportError, ImportPreview};
pub use migration::{
    migration_tracking, MigrationPhase, MigrationProgress, MigrationStep, MigrationSteps,
    MigrationTrackingEntry,
};
pub use reconcile::{reconcile, DerivedPatch, Reconciliation};
pub use repository::{ClientRepository, ClientSummaryView, ClientView, RepositoryError};
pub use router::{client_router, DeriveResponse, UpdateRequest};
pub use service::{ClientService, ClientServiceError, ReconcileOutcome};
pub use tools::{OutilLogiciel, OutilStatut, Outils};
pub use update::{apply_all, ClientUpdate};
