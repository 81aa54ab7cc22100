use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::migration::MigrationSteps;
use super::tools::Outils;

/// Label shared by every derived attribute that cannot be decided yet.
pub const UNDEFINED_LABEL: &str = "À définir";

/// Action value that enrolls a client in the migration onto the firm's tooling.
pub const MIGRATION_ACTION: &str = "Migration sur l'outil du cabinet";

/// Identifier of the user owning a set of client documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerId(pub String);

/// Document identifier of a client within its owner's collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClientId(pub String);

static CLIENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

impl ClientId {
    /// Fresh identifier: creation time in milliseconds plus a process-wide sequence.
    pub fn generate() -> Self {
        let sequence = CLIENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!(
            "client_{}_{sequence:04}",
            Utc::now().timestamp_millis()
        ))
    }
}

/// Client document as stored by the dashboard, raw fields plus a denormalized
/// copy of the derived attributes. Keys this model does not know are kept in
/// `extra` so whole-document writes return them unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Client {
    #[serde(deserialize_with = "null_as_default")]
    pub id: ClientId,
    #[serde(deserialize_with = "null_as_default")]
    pub identifiant_interne: String,
    #[serde(deserialize_with = "null_as_default")]
    pub siren: String,
    #[serde(deserialize_with = "null_as_default")]
    pub raison_sociale: String,
    #[serde(deserialize_with = "null_as_default")]
    pub forme_juridique: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub contact_principal: ContactPrincipal,
    #[serde(deserialize_with = "null_as_default")]
    pub missions_actuelles: MissionsActuelles,
    #[serde(deserialize_with = "null_as_default")]
    pub activites: Activites,
    #[serde(deserialize_with = "null_as_default")]
    pub obligations_legales: ObligationsLegales,
    #[serde(deserialize_with = "null_as_default")]
    pub questionnaire: Questionnaire,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Outils::is_empty")]
    pub outils: Outils,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maturite_digitale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cartographie_client: Option<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub actions_a_mener: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub migration_steps: MigrationSteps,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Explicit `null` reads the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<Option<String>>),
}

/// `actionsAMener` is stored either as a list or as a single value.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(action)) if action.trim().is_empty() => Vec::new(),
        Some(OneOrMany::One(action)) => vec![action],
        Some(OneOrMany::Many(actions)) => actions.into_iter().flatten().collect(),
    })
}

impl Client {
    /// Blank record, every raw field unset.
    pub fn empty(id: ClientId) -> Self {
        Self {
            identifiant_interne: id.0.clone(),
            id,
            ..Self::default()
        }
    }

    /// Record handed to the new-client form: VAT and clientele pre-selected.
    pub fn template(id: ClientId) -> Self {
        let mut client = Self::empty(id);
        client.activites.regime_tva = RegimeTva::Debit.label().to_string();
        client.activites.typologie_clientele = TypologieClientele::BtoB.label().to_string();
        client.maturite_digitale = Some(UNDEFINED_LABEL.to_string());
        client
    }

    pub fn regime_tva(&self) -> Option<RegimeTva> {
        RegimeTva::from_label(&self.activites.regime_tva)
    }

    pub fn typologie_clientele(&self) -> Option<TypologieClientele> {
        TypologieClientele::from_label(&self.activites.typologie_clientele)
    }

    pub fn is_migration_candidate(&self) -> bool {
        self.actions_a_mener
            .iter()
            .any(|action| action.trim() == MIGRATION_ACTION)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactPrincipal {
    #[serde(deserialize_with = "null_as_default")]
    pub nom: String,
    #[serde(deserialize_with = "null_as_default")]
    pub prenom: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MissionsActuelles {
    #[serde(deserialize_with = "null_as_default")]
    pub collaborateur_referent: String,
    #[serde(deserialize_with = "null_as_default")]
    pub expert_comptable: String,
    #[serde(deserialize_with = "null_as_default")]
    pub type_mission: String,
}

/// Activity profile. `regimeTVA` and `typologieClientele` drive the obligation rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Activites {
    #[serde(rename = "codeAPE", deserialize_with = "null_as_default")]
    pub code_ape: String,
    #[serde(rename = "secteurActivites", deserialize_with = "null_as_default")]
    pub secteur_activites: String,
    #[serde(rename = "regimeTVA", deserialize_with = "null_as_default")]
    pub regime_tva: String,
    #[serde(rename = "regimeFiscal", deserialize_with = "null_as_default")]
    pub regime_fiscal: String,
    #[serde(rename = "typologieClientele", deserialize_with = "null_as_default")]
    pub typologie_clientele: String,
}

/// Stored copy of the obligation flags and level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObligationsLegales {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assujetti_reforme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e_invoicing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e_reporting_transaction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e_reporting_paiement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pa_emission: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pa_reception: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub niveau_obligation: Option<String>,
}

/// Questionnaire answers. Scored answers are `q1`..`q13`; the remaining fields
/// carry free-text details attached to some answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Questionnaire {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q4_software: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q4_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q5: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q5_software: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q5_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q6: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q6_software: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q7: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q7_software: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q8: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q8_software: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q9: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q10: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q10_function: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q11: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q12: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q12_actions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q13: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q13_project: Option<String>,
}

impl Questionnaire {
    /// Number of scored questions the form asks.
    pub const TOTAL_QUESTIONS: usize = 13;

    /// Scored answers in question order.
    pub fn answers(&self) -> [Option<&str>; Self::TOTAL_QUESTIONS] {
        [
            self.q1.as_deref(),
            self.q2.as_deref(),
            self.q3.as_deref(),
            self.q4.as_deref(),
            self.q5.as_deref(),
            self.q6.as_deref(),
            self.q7.as_deref(),
            self.q8.as_deref(),
            self.q9.as_deref(),
            self.q10.as_deref(),
            self.q11.as_deref(),
            self.q12.as_deref(),
            self.q13.as_deref(),
        ]
    }

    fn details(&self) -> [Option<&str>; 10] {
        [
            self.q4_software.as_deref(),
            self.q4_method.as_deref(),
            self.q5_software.as_deref(),
            self.q5_method.as_deref(),
            self.q6_software.as_deref(),
            self.q7_software.as_deref(),
            self.q8_software.as_deref(),
            self.q10_function.as_deref(),
            self.q12_actions.as_deref(),
            self.q13_project.as_deref(),
        ]
    }

    /// Count of non-empty scored answers; detail fields never count.
    pub fn answered_count(&self) -> usize {
        self.answers()
            .into_iter()
            .flatten()
            .filter(|answer| !answer.trim().is_empty())
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.answered_count() >= Self::TOTAL_QUESTIONS
    }

    /// True when no key at all is present, details included.
    pub fn is_untouched(&self) -> bool {
        self.answers().iter().all(Option::is_none) && self.details().iter().all(Option::is_none)
    }

    /// Map the option codes posted by the questionnaire form onto the stored
    /// answer vocabulary. Answers already in stored form pass through.
    pub fn normalized(mut self) -> Self {
        for answer in [
            &mut self.q4,
            &mut self.q5,
            &mut self.q6,
            &mut self.q7,
            &mut self.q8,
            &mut self.q10,
            &mut self.q12,
            &mut self.q13,
        ] {
            normalize_yes_no(answer);
        }

        if let Some(value) = self.q11.as_mut() {
            if value.trim() == "paper" {
                *value = "papier".to_string();
            }
        }

        self
    }
}

fn normalize_yes_no(answer: &mut Option<String>) {
    if let Some(value) = answer.as_mut() {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" | "oui" => *value = "Oui".to_string(),
            "no" | "non" => *value = "Non".to_string(),
            _ => {}
        }
    }
}

/// VAT regime recognised by the obligation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegimeTva {
    #[serde(rename = "Débit")]
    Debit,
    #[serde(rename = "Encaissement")]
    Encaissement,
    #[serde(rename = "Non concerné")]
    NonConcerne,
}

impl RegimeTva {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Debit => "Débit",
            Self::Encaissement => "Encaissement",
            Self::NonConcerne => "Non concerné",
        }
    }

    /// Unknown or blank labels are treated as unset.
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Débit" => Some(Self::Debit),
            "Encaissement" => Some(Self::Encaissement),
            "Non concerné" => Some(Self::NonConcerne),
            _ => None,
        }
    }
}

/// Clientele typology recognised by the obligation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypologieClientele {
    #[serde(rename = "B to B")]
    BtoB,
    #[serde(rename = "B to C")]
    BtoC,
    #[serde(rename = "Organismes publics")]
    OrganismesPublics,
    #[serde(rename = "Mixtes")]
    Mixtes,
}

impl TypologieClientele {
    pub const fn label(self) -> &'static str {
        match self {
            Self::BtoB => "B to B",
            Self::BtoC => "B to C",
            Self::OrganismesPublics => "Organismes publics",
            Self::Mixtes => "Mixtes",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim() {
            "B to B" => Some(Self::BtoB),
            "B to C" => Some(Self::BtoC),
            "Organismes publics" => Some(Self::OrganismesPublics),
            "Mixtes" => Some(Self::Mixtes),
            _ => None,
        }
    }
}

/// Tri-state value of a legal-obligation flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObligationFlag {
    #[serde(rename = "Oui")]
    Oui,
    #[serde(rename = "Non")]
    Non,
    #[serde(rename = "À définir")]
    ADefinir,
}

impl ObligationFlag {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Oui => "Oui",
            Self::Non => "Non",
            Self::ADefinir => UNDEFINED_LABEL,
        }
    }

    pub const fn is_defined(self) -> bool {
        !matches!(self, Self::ADefinir)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObligationLevel {
    #[serde(rename = "Faibles")]
    Faibles,
    #[serde(rename = "Intermédiaire")]
    Intermediaire,
    #[serde(rename = "Fortes")]
    Fortes,
    #[serde(rename = "À définir")]
    ADefinir,
}

impl ObligationLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Faibles => "Faibles",
            Self::Intermediaire => "Intermédiaire",
            Self::Fortes => "Fortes",
            Self::ADefinir => UNDEFINED_LABEL,
        }
    }

    pub const fn is_defined(self) -> bool {
        !matches!(self, Self::ADefinir)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaturityLevel {
    #[serde(rename = "Faible")]
    Faible,
    #[serde(rename = "Intermédiaire")]
    Intermediaire,
    #[serde(rename = "Élevée")]
    Elevee,
    #[serde(rename = "À définir")]
    ADefinir,
}

impl MaturityLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Faible => "Faible",
            Self::Intermediaire => "Intermédiaire",
            Self::Elevee => "Élevée",
            Self::ADefinir => UNDEFINED_LABEL,
        }
    }
}

/// Four-bucket outreach priority. The stored strings differ in casing between
/// the two "faible" buckets and are kept verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cartographie {
    #[serde(rename = "Priorité haute - Clients en risques de non conformité")]
    RisqueNonConformite,
    #[serde(rename = "priorité intermédiaire - clients à opportunités émergentes")]
    OpportunitesEmergentes,
    #[serde(rename = "priorité faible - clients innovants et stratégiques")]
    InnovantsSousObligations,
    #[serde(rename = "Priorité faible - Clients innovants et stratégiques")]
    InnovantsStrategiques,
    #[serde(rename = "À définir")]
    ADefinir,
}

impl Cartographie {
    pub const fn label(self) -> &'static str {
        match self {
            Self::RisqueNonConformite => "Priorité haute - Clients en risques de non conformité",
            Self::OpportunitesEmergentes => {
                "priorité intermédiaire - clients à opportunités émergentes"
            }
            Self::InnovantsSousObligations => "priorité faible - clients innovants et stratégiques",
            Self::InnovantsStrategiques => "Priorité faible - Clients innovants et stratégiques",
            Self::ADefinir => UNDEFINED_LABEL,
        }
    }
}
