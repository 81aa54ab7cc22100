use serde::{Deserialize, Serialize};

use super::domain::{Client, ObligationFlag, RegimeTva, TypologieClientele};
use super::migration::MigrationStep;
use super::tools::{OutilLogiciel, OutilStatut};

/// Typed edit of a single raw client field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientUpdate {
    SetIdentifiantInterne { value: String },
    SetSiren { value: String },
    SetRaisonSociale { value: String },
    SetFormeJuridique { value: String },
    SetContactNom { value: String },
    SetContactPrenom { value: String },
    SetContactEmail { value: String },
    SetCollaborateurReferent { value: String },
    SetExpertComptable { value: String },
    SetTypeMission { value: String },
    SetCodeApe { value: String },
    SetSecteurActivites { value: String },
    SetRegimeTva { value: Option<RegimeTva> },
    SetRegimeFiscal { value: String },
    SetTypologieClientele { value: Option<TypologieClientele> },
    SetActionsAMener { value: Vec<String> },
    SetAvatar { value: Option<String> },
    SetOutilLogiciel { outil: OutilLogiciel, value: String },
    SetOutilStatut { outil: OutilStatut, value: ObligationFlag },
    SetMigrationStep { step: MigrationStep, done: bool },
}

impl ClientUpdate {
    pub fn apply(self, client: &mut Client) {
        match self {
            Self::SetIdentifiantInterne { value } => client.identifiant_interne = value,
            Self::SetSiren { value } => client.siren = value,
            Self::SetRaisonSociale { value } => client.raison_sociale = value,
            Self::SetFormeJuridique { value } => client.forme_juridique = value,
            Self::SetContactNom { value } => client.contact_principal.nom = value,
            Self::SetContactPrenom { value } => client.contact_principal.prenom = value,
            Self::SetContactEmail { value } => client.contact_principal.email = value,
            Self::SetCollaborateurReferent { value } => {
                client.missions_actuelles.collaborateur_referent = value
            }
            Self::SetExpertComptable { value } => client.missions_actuelles.expert_comptable = value,
            Self::SetTypeMission { value } => client.missions_actuelles.type_mission = value,
            Self::SetCodeApe { value } => client.activites.code_ape = value,
            Self::SetSecteurActivites { value } => client.activites.secteur_activites = value,
            Self::SetRegimeTva { value } => {
                client.activites.regime_tva = value
                    .map(|regime| regime.label().to_string())
                    .unwrap_or_default()
            }
            Self::SetRegimeFiscal { value } => client.activites.regime_fiscal = value,
            Self::SetTypologieClientele { value } => {
                client.activites.typologie_clientele = value
                    .map(|typologie| typologie.label().to_string())
                    .unwrap_or_default()
            }
            Self::SetActionsAMener { value } => client.actions_a_mener = value,
            Self::SetAvatar { value } => client.avatar = value,
            Self::SetOutilLogiciel { outil, value } => client.outils.set_logiciel(outil, value),
            Self::SetOutilStatut { outil, value } => client.outils.set_statut(outil, value),
            Self::SetMigrationStep { step, done } => client.migration_steps.set(step, done),
        }
    }
}

pub fn apply_all<I>(client: &mut Client, updates: I)
where
    I: IntoIterator<Item = ClientUpdate>,
{
    for update in updates {
        update.apply(client);
    }
}
