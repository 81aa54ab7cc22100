use serde::{Deserialize, Serialize};

use super::domain::{Client, ClientId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationPhase {
    Parametrage,
    RecuperationDonnees,
    CommunicationClient,
}

impl MigrationPhase {
    pub const fn ordered() -> [Self; 3] {
        [
            Self::Parametrage,
            Self::RecuperationDonnees,
            Self::CommunicationClient,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Parametrage => "Paramétrage",
            Self::RecuperationDonnees => "Récupération des données",
            Self::CommunicationClient => "Communication client",
        }
    }

    pub const fn steps(self) -> [MigrationStep; 3] {
        match self {
            Self::Parametrage => [
                MigrationStep::CreationDossier,
                MigrationStep::PlanComptable,
                MigrationStep::ParametrageBanques,
            ],
            Self::RecuperationDonnees => [
                MigrationStep::BalanceOuverture,
                MigrationStep::GrandLivre,
                MigrationStep::Immobilisations,
            ],
            Self::CommunicationClient => [
                MigrationStep::InformationClient,
                MigrationStep::FormationClient,
                MigrationStep::AccesPlateforme,
            ],
        }
    }
}

/// Individual checklist item of the migration workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationStep {
    CreationDossier,
    PlanComptable,
    ParametrageBanques,
    BalanceOuverture,
    GrandLivre,
    Immobilisations,
    InformationClient,
    FormationClient,
    AccesPlateforme,
}

impl MigrationStep {
    pub const fn phase(self) -> MigrationPhase {
        match self {
            Self::CreationDossier | Self::PlanComptable | Self::ParametrageBanques => {
                MigrationPhase::Parametrage
            }
            Self::BalanceOuverture | Self::GrandLivre | Self::Immobilisations => {
                MigrationPhase::RecuperationDonnees
            }
            Self::InformationClient | Self::FormationClient | Self::AccesPlateforme => {
                MigrationPhase::CommunicationClient
            }
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CreationDossier => "Création du dossier",
            Self::PlanComptable => "Reprise du plan comptable",
            Self::ParametrageBanques => "Paramétrage des flux bancaires",
            Self::BalanceOuverture => "Balance d'ouverture",
            Self::GrandLivre => "Grand livre",
            Self::Immobilisations => "Tableau des immobilisations",
            Self::InformationClient => "Information du client",
            Self::FormationClient => "Formation du client",
            Self::AccesPlateforme => "Accès à la plateforme",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParametrageSteps {
    pub creation_dossier: bool,
    pub plan_comptable: bool,
    pub parametrage_banques: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecuperationDonneesSteps {
    pub balance_ouverture: bool,
    pub grand_livre: bool,
    pub immobilisations: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommunicationClientSteps {
    pub information_client: bool,
    pub formation_client: bool,
    pub acces_plateforme: bool,
}

/// Three-phase checklist stored on the client document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MigrationSteps {
    pub parametrage: ParametrageSteps,
    pub recuperation_donnees: RecuperationDonneesSteps,
    pub communication_client: CommunicationClientSteps,
}

impl MigrationSteps {
    pub fn is_done(&self, step: MigrationStep) -> bool {
        match step {
            MigrationStep::CreationDossier => self.parametrage.creation_dossier,
            MigrationStep::PlanComptable => self.parametrage.plan_comptable,
            MigrationStep::ParametrageBanques => self.parametrage.parametrage_banques,
            MigrationStep::BalanceOuverture => self.recuperation_donnees.balance_ouverture,
            MigrationStep::GrandLivre => self.recuperation_donnees.grand_livre,
            MigrationStep::Immobilisations => self.recuperation_donnees.immobilisations,
            MigrationStep::InformationClient => self.communication_client.information_client,
            MigrationStep::FormationClient => self.communication_client.formation_client,
            MigrationStep::AccesPlateforme => self.communication_client.acces_plateforme,
        }
    }

    pub fn set(&mut self, step: MigrationStep, done: bool) {
        let slot = match step {
            MigrationStep::CreationDossier => &mut self.parametrage.creation_dossier,
            MigrationStep::PlanComptable => &mut self.parametrage.plan_comptable,
            MigrationStep::ParametrageBanques => &mut self.parametrage.parametrage_banques,
            MigrationStep::BalanceOuverture => &mut self.recuperation_donnees.balance_ouverture,
            MigrationStep::GrandLivre => &mut self.recuperation_donnees.grand_livre,
            MigrationStep::Immobilisations => &mut self.recuperation_donnees.immobilisations,
            MigrationStep::InformationClient => &mut self.communication_client.information_client,
            MigrationStep::FormationClient => &mut self.communication_client.formation_client,
            MigrationStep::AccesPlateforme => &mut self.communication_client.acces_plateforme,
        };
        *slot = done;
    }

    pub fn progress(&self) -> MigrationProgress {
        let phases: Vec<PhaseProgressEntry> = MigrationPhase::ordered()
            .into_iter()
            .map(|phase| {
                let steps = phase.steps();
                PhaseProgressEntry {
                    phase,
                    phase_label: phase.label(),
                    completed: steps.iter().filter(|step| self.is_done(**step)).count(),
                    total: steps.len(),
                }
            })
            .collect();

        let completed: usize = phases.iter().map(|entry| entry.completed).sum();
        let total: usize = phases.iter().map(|entry| entry.total).sum();
        let next_step = MigrationPhase::ordered()
            .into_iter()
            .flat_map(MigrationPhase::steps)
            .find(|step| !self.is_done(*step));

        MigrationProgress {
            completion_pct: completed as f32 / total as f32 * 100.0,
            completed,
            total,
            next_step,
            phases,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseProgressEntry {
    pub phase: MigrationPhase,
    pub phase_label: &'static str,
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MigrationProgress {
    pub phases: Vec<PhaseProgressEntry>,
    pub completed: usize,
    pub total: usize,
    pub completion_pct: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_step: Option<MigrationStep>,
}

/// Row of the migration tracking list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MigrationTrackingEntry {
    pub client_id: ClientId,
    pub raison_sociale: String,
    pub collaborateur_referent: String,
    pub progress: MigrationProgress,
}

/// Clients enrolled in the migration, in the order given.
pub fn migration_tracking<'a, I>(clients: I) -> Vec<MigrationTrackingEntry>
where
    I: IntoIterator<Item = &'a Client>,
{
    clients
        .into_iter()
        .filter(|client| client.is_migration_candidate())
        .map(|client| MigrationTrackingEntry {
            client_id: client.id.clone(),
            raison_sociale: client.raison_sociale.clone(),
            collaborateur_referent: client.missions_actuelles.collaborateur_referent.clone(),
            progress: client.migration_steps.progress(),
        })
        .collect()
}
