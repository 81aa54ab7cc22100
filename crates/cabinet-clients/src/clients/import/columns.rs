use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Serialize;

use crate::clients::domain::{Client, RegimeTva, TypologieClientele};

/// Client fields an import file column can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ClientColumn {
    IdentifiantInterne,
    Siren,
    RaisonSociale,
    FormeJuridique,
    ContactPrincipal,
    CollaborateurReferent,
    ExpertComptable,
    TypeMission,
    #[serde(rename = "codeAPE")]
    CodeApe,
    SecteurActivites,
    #[serde(rename = "regimeTVA")]
    RegimeTva,
    RegimeFiscal,
    TypologieClientele,
    ObligationsLegales,
}

impl ClientColumn {
    pub const fn ordered() -> [Self; 14] {
        [
            Self::IdentifiantInterne,
            Self::Siren,
            Self::RaisonSociale,
            Self::FormeJuridique,
            Self::ContactPrincipal,
            Self::CollaborateurReferent,
            Self::ExpertComptable,
            Self::TypeMission,
            Self::CodeApe,
            Self::SecteurActivites,
            Self::RegimeTva,
            Self::RegimeFiscal,
            Self::TypologieClientele,
            Self::ObligationsLegales,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::IdentifiantInterne => "Identifiant interne",
            Self::Siren => "SIREN",
            Self::RaisonSociale => "Raison sociale",
            Self::FormeJuridique => "Forme juridique",
            Self::ContactPrincipal => "Contact principal",
            Self::CollaborateurReferent => "Collaborateur référent",
            Self::ExpertComptable => "Expert-comptable",
            Self::TypeMission => "Type de mission",
            Self::CodeApe => "Code APE",
            Self::SecteurActivites => "Secteur d’activités",
            Self::RegimeTva => "Régime de TVA",
            Self::RegimeFiscal => "Régime fiscal",
            Self::TypologieClientele => "Typologie de clientèle",
            Self::ObligationsLegales => "Obligations légales",
        }
    }

    const fn key(self) -> &'static str {
        match self {
            Self::IdentifiantInterne => "identifiantInterne",
            Self::Siren => "siren",
            Self::RaisonSociale => "raisonSociale",
            Self::FormeJuridique => "formeJuridique",
            Self::ContactPrincipal => "contactPrincipal",
            Self::CollaborateurReferent => "collaborateurReferent",
            Self::ExpertComptable => "expertComptable",
            Self::TypeMission => "typeMission",
            Self::CodeApe => "codeAPE",
            Self::SecteurActivites => "secteurActivites",
            Self::RegimeTva => "regimeTVA",
            Self::RegimeFiscal => "regimeFiscal",
            Self::TypologieClientele => "typologieClientele",
            Self::ObligationsLegales => "obligationsLegales",
        }
    }

    /// Column matching a file header, by display label or document key.
    pub fn from_header(header: &str) -> Option<Self> {
        header_map().get(&normalize_header(header)).copied()
    }

    /// Write a cell into the matching raw field. Derived columns are ignored.
    pub(crate) fn apply(self, client: &mut Client, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        let owned = value.to_string();

        match self {
            Self::IdentifiantInterne => client.identifiant_interne = owned,
            Self::Siren => client.siren = owned,
            Self::RaisonSociale => client.raison_sociale = owned,
            Self::FormeJuridique => client.forme_juridique = owned,
            Self::ContactPrincipal => {
                let (prenom, nom, email) = split_contact(value);
                client.contact_principal.prenom = prenom;
                client.contact_principal.nom = nom;
                client.contact_principal.email = email;
            }
            Self::CollaborateurReferent => client.missions_actuelles.collaborateur_referent = owned,
            Self::ExpertComptable => client.missions_actuelles.expert_comptable = owned,
            Self::TypeMission => client.missions_actuelles.type_mission = owned,
            Self::CodeApe => client.activites.code_ape = owned,
            Self::SecteurActivites => client.activites.secteur_activites = owned,
            Self::RegimeTva => {
                client.activites.regime_tva = RegimeTva::from_label(value)
                    .map(|regime| regime.label().to_string())
                    .unwrap_or(owned)
            }
            Self::RegimeFiscal => client.activites.regime_fiscal = owned,
            Self::TypologieClientele => {
                client.activites.typologie_clientele = TypologieClientele::from_label(value)
                    .map(|typologie| typologie.label().to_string())
                    .unwrap_or(owned)
            }
            Self::ObligationsLegales => {}
        }
    }
}

static HEADER_MAP: OnceLock<HashMap<String, ClientColumn>> = OnceLock::new();

fn header_map() -> &'static HashMap<String, ClientColumn> {
    HEADER_MAP.get_or_init(|| {
        let mut map = HashMap::new();
        for column in ClientColumn::ordered() {
            map.insert(normalize_header(column.label()), column);
            map.insert(normalize_header(column.key()), column);
        }
        map
    })
}

pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value
        .replace(['\u{feff}', '\u{200b}'], "")
        .replace(['\u{2019}', '`'], "'");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

/// Split "Prénom Nom email" into its parts; the token holding `@` is the email.
fn split_contact(value: &str) -> (String, String, String) {
    let mut email = String::new();
    let mut names = Vec::new();
    for token in value.split_whitespace() {
        if email.is_empty() && token.contains('@') {
            email = token
                .trim_matches(|c| matches!(c, '<' | '>' | '(' | ')' | ',' | ';'))
                .to_string();
        } else {
            names.push(token);
        }
    }

    let prenom = names.first().map(|name| name.to_string()).unwrap_or_default();
    let nom = names.get(1..).map(|rest| rest.join(" ")).unwrap_or_default();
    (prenom, nom, email)
}
