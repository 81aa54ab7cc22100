use serde::{Deserialize, Serialize};

use super::domain::{ObligationFlag, Questionnaire};

/// Software and interoperability facts recorded in the client's "Outils" section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Outils {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logiciel_caisse: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logiciel_facturation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logiciel_gestion_achats: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logiciel_comptable_client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genere_e_reporting: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conforme_facturation_electronique: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interoperable_comptable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interoperable_pa_emission: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interoperable_autres_logiciels: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logiciel_notes_frais: Option<String>,
}

/// Free-text software field, each paired with the questionnaire answer it details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutilLogiciel {
    LogicielCaisse,
    LogicielFacturation,
    LogicielGestionAchats,
    LogicielComptableClient,
}

impl OutilLogiciel {
    pub const ALL: [Self; 4] = [
        Self::LogicielCaisse,
        Self::LogicielFacturation,
        Self::LogicielGestionAchats,
        Self::LogicielComptableClient,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::LogicielCaisse => "Logiciel de caisse",
            Self::LogicielFacturation => "Logiciel de facturation",
            Self::LogicielGestionAchats => "Logiciel de gestion commerciale",
            Self::LogicielComptableClient => "Logiciel comptable du client",
        }
    }

    /// Questionnaire answer and the software or method detail given with it.
    pub fn answer(self, questionnaire: &Questionnaire) -> (Option<&str>, Option<&str>) {
        let q = questionnaire;
        let (answer, software, method) = match self {
            Self::LogicielCaisse => (q.q4.as_deref(), q.q4_software.as_deref(), q.q4_method.as_deref()),
            Self::LogicielFacturation => {
                (q.q5.as_deref(), q.q5_software.as_deref(), q.q5_method.as_deref())
            }
            Self::LogicielGestionAchats => (q.q6.as_deref(), q.q6_software.as_deref(), None),
            Self::LogicielComptableClient => (q.q7.as_deref(), q.q7_software.as_deref(), None),
        };

        let detail = match answer.map(str::trim) {
            Some("Oui") => software,
            Some("Non") => method,
            _ => None,
        };
        (answer, detail)
    }
}

/// Oui / Non / À définir status field of the tools section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutilStatut {
    GenereEReporting,
    ConformeFacturationElectronique,
    InteroperableComptable,
    InteroperablePaEmission,
    InteroperableAutresLogiciels,
    LogicielNotesFrais,
}

impl OutilStatut {
    pub const ALL: [Self; 6] = [
        Self::GenereEReporting,
        Self::ConformeFacturationElectronique,
        Self::InteroperableComptable,
        Self::InteroperablePaEmission,
        Self::InteroperableAutresLogiciels,
        Self::LogicielNotesFrais,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::GenereEReporting => "Génère le e-reporting",
            Self::ConformeFacturationElectronique => "Conforme facturation électronique",
            Self::InteroperableComptable => "Interopérable avec le logiciel comptable",
            Self::InteroperablePaEmission => "Interopérable avec la PA en émission",
            Self::InteroperableAutresLogiciels => "Interopérable avec les autres logiciels",
            Self::LogicielNotesFrais => "Logiciel de gestion des notes de frais",
        }
    }

    /// E-reporting generation only applies when the client has a till system.
    pub fn applies_to(self, questionnaire: &Questionnaire) -> bool {
        !(matches!(self, Self::GenereEReporting)
            && questionnaire.q4.as_deref().map(str::trim) == Some("Non"))
    }
}

impl Outils {
    pub fn logiciel(&self, outil: OutilLogiciel) -> Option<&str> {
        match outil {
            OutilLogiciel::LogicielCaisse => self.logiciel_caisse.as_deref(),
            OutilLogiciel::LogicielFacturation => self.logiciel_facturation.as_deref(),
            OutilLogiciel::LogicielGestionAchats => self.logiciel_gestion_achats.as_deref(),
            OutilLogiciel::LogicielComptableClient => self.logiciel_comptable_client.as_deref(),
        }
    }

    pub fn set_logiciel(&mut self, outil: OutilLogiciel, value: String) {
        let value = (!value.trim().is_empty()).then_some(value);
        match outil {
            OutilLogiciel::LogicielCaisse => self.logiciel_caisse = value,
            OutilLogiciel::LogicielFacturation => self.logiciel_facturation = value,
            OutilLogiciel::LogicielGestionAchats => self.logiciel_gestion_achats = value,
            OutilLogiciel::LogicielComptableClient => self.logiciel_comptable_client = value,
        }
    }

    fn statut_slot(&mut self, outil: OutilStatut) -> &mut Option<String> {
        match outil {
            OutilStatut::GenereEReporting => &mut self.genere_e_reporting,
            OutilStatut::ConformeFacturationElectronique => {
                &mut self.conforme_facturation_electronique
            }
            OutilStatut::InteroperableComptable => &mut self.interoperable_comptable,
            OutilStatut::InteroperablePaEmission => &mut self.interoperable_pa_emission,
            OutilStatut::InteroperableAutresLogiciels => &mut self.interoperable_autres_logiciels,
            OutilStatut::LogicielNotesFrais => &mut self.logiciel_notes_frais,
        }
    }

    /// Stored status; unset or unrecognised values read as À définir.
    pub fn statut(&self, outil: OutilStatut) -> ObligationFlag {
        let raw = match outil {
            OutilStatut::GenereEReporting => &self.genere_e_reporting,
            OutilStatut::ConformeFacturationElectronique => &self.conforme_facturation_electronique,
            OutilStatut::InteroperableComptable => &self.interoperable_comptable,
            OutilStatut::InteroperablePaEmission => &self.interoperable_pa_emission,
            OutilStatut::InteroperableAutresLogiciels => &self.interoperable_autres_logiciels,
            OutilStatut::LogicielNotesFrais => &self.logiciel_notes_frais,
        };
        match raw.as_deref().map(str::trim) {
            Some("Oui") => ObligationFlag::Oui,
            Some("Non") => ObligationFlag::Non,
            _ => ObligationFlag::ADefinir,
        }
    }

    pub fn set_statut(&mut self, outil: OutilStatut, value: ObligationFlag) {
        *self.statut_slot(outil) = Some(value.label().to_string());
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unset_status_reads_as_undefined() {
        let mut outils: Outils = serde_json::from_value(json!({
            "genereEReporting": "Oui",
            "interoperablePaEmission": "peut-être"
        }))
        .expect("tools parse");

        assert_eq!(outils.statut(OutilStatut::GenereEReporting), ObligationFlag::Oui);
        assert_eq!(
            outils.statut(OutilStatut::InteroperablePaEmission),
            ObligationFlag::ADefinir
        );
        assert_eq!(
            outils.statut(OutilStatut::LogicielNotesFrais),
            ObligationFlag::ADefinir
        );

        outils.set_statut(OutilStatut::LogicielNotesFrais, ObligationFlag::Non);
        assert_eq!(outils.logiciel_notes_frais.as_deref(), Some("Non"));
    }

    #[test]
    fn blank_software_clears_the_field() {
        let mut outils = Outils::default();
        outils.set_logiciel(OutilLogiciel::LogicielFacturation, "Sage 50".to_string());
        assert_eq!(outils.logiciel(OutilLogiciel::LogicielFacturation), Some("Sage 50"));

        outils.set_logiciel(OutilLogiciel::LogicielFacturation, "  ".to_string());
        assert!(outils.is_empty());
    }

    #[test]
    fn software_detail_follows_the_questionnaire_answer() {
        let questionnaire = Questionnaire {
            q4: Some("Oui".to_string()),
            q4_software: Some("Zelty".to_string()),
            q5: Some("Non".to_string()),
            q5_software: Some("ignored".to_string()),
            q5_method: Some("Excel".to_string()),
            ..Questionnaire::default()
        };

        assert_eq!(
            OutilLogiciel::LogicielCaisse.answer(&questionnaire),
            (Some("Oui"), Some("Zelty"))
        );
        assert_eq!(
            OutilLogiciel::LogicielFacturation.answer(&questionnaire),
            (Some("Non"), Some("Excel"))
        );
        assert_eq!(
            OutilLogiciel::LogicielComptableClient.answer(&questionnaire),
            (None, None)
        );
    }

    #[test]
    fn e_reporting_status_is_hidden_without_a_till() {
        let without_till = Questionnaire {
            q4: Some("Non".to_string()),
            ..Questionnaire::default()
        };
        assert!(!OutilStatut::GenereEReporting.applies_to(&without_till));
        assert!(OutilStatut::ConformeFacturationElectronique.applies_to(&without_till));
        assert!(OutilStatut::GenereEReporting.applies_to(&Questionnaire::default()));
    }
}
