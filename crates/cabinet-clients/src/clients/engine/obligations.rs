use serde::{Deserialize, Serialize};

use super::super::domain::{ObligationFlag, ObligationLevel, RegimeTva, TypologieClientele};

/// Legal-obligation flags inferred from the VAT regime and clientele typology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObligationFlags {
    pub assujetti_reforme: ObligationFlag,
    pub e_invoicing: ObligationFlag,
    pub e_reporting_transaction: ObligationFlag,
    pub e_reporting_paiement: ObligationFlag,
    pub pa_emission: ObligationFlag,
    pub pa_reception: ObligationFlag,
}

impl ObligationFlags {
    pub fn all(&self) -> [ObligationFlag; 6] {
        [
            self.assujetti_reforme,
            self.e_invoicing,
            self.e_reporting_transaction,
            self.e_reporting_paiement,
            self.pa_emission,
            self.pa_reception,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObligationScore {
    pub score: u8,
    pub level: ObligationLevel,
}

pub fn classify(
    regime: Option<RegimeTva>,
    typologie: Option<TypologieClientele>,
) -> ObligationFlags {
    let assujetti_reforme = match regime {
        Some(RegimeTva::Debit | RegimeTva::Encaissement) => ObligationFlag::Oui,
        Some(RegimeTva::NonConcerne) => ObligationFlag::Non,
        None => ObligationFlag::ADefinir,
    };

    let e_invoicing = match typologie {
        Some(TypologieClientele::BtoB | TypologieClientele::Mixtes) => ObligationFlag::Oui,
        Some(TypologieClientele::BtoC | TypologieClientele::OrganismesPublics) => {
            ObligationFlag::Non
        }
        None => ObligationFlag::ADefinir,
    };

    let e_reporting_transaction = match typologie {
        Some(TypologieClientele::BtoC | TypologieClientele::Mixtes) => ObligationFlag::Oui,
        Some(TypologieClientele::BtoB | TypologieClientele::OrganismesPublics) => {
            ObligationFlag::Non
        }
        None => ObligationFlag::ADefinir,
    };

    // No undecided state: an unset regime reads as "Non".
    let e_reporting_paiement = match regime {
        Some(RegimeTva::Encaissement) => ObligationFlag::Oui,
        _ => ObligationFlag::Non,
    };

    ObligationFlags {
        assujetti_reforme,
        e_invoicing,
        e_reporting_transaction,
        e_reporting_paiement,
        pa_emission: e_invoicing,
        pa_reception: assujetti_reforme,
    }
}

pub fn score(regime: Option<RegimeTva>, typologie: Option<TypologieClientele>) -> ObligationScore {
    let regime_points = match regime {
        Some(RegimeTva::Debit) => 1,
        Some(RegimeTva::Encaissement) => 2,
        Some(RegimeTva::NonConcerne) | None => 0,
    };

    let typologie_points = match typologie {
        Some(TypologieClientele::Mixtes) => 3,
        Some(
            TypologieClientele::BtoB
            | TypologieClientele::BtoC
            | TypologieClientele::OrganismesPublics,
        ) => 1,
        None => 0,
    };

    let score = regime_points + typologie_points;
    let level = match score {
        3.. => ObligationLevel::Fortes,
        2 => ObligationLevel::Intermediaire,
        _ if regime.is_some() || typologie.is_some() => ObligationLevel::Faibles,
        _ => ObligationLevel::ADefinir,
    };

    ObligationScore { score, level }
}
