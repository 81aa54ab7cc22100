use serde::{Deserialize, Serialize};

use super::domain::{Client, ObligationsLegales};
use super::engine::{recompute, DerivedFields};

/// Merge-patch carrying only the derived attributes of a client document.
///
/// Serializes to the nested document shape (`obligationsLegales`,
/// `maturiteDigitale`, `cartographieClient`) so stores that accept JSON merge
/// patches can apply it as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedPatch {
    pub obligations_legales: ObligationsLegales,
    pub maturite_digitale: String,
    pub cartographie_client: String,
}

impl DerivedPatch {
    pub fn from_derived(derived: &DerivedFields) -> Self {
        let flags = &derived.obligations;
        let label = |value: &'static str| Some(value.to_string());

        Self {
            obligations_legales: ObligationsLegales {
                assujetti_reforme: label(flags.assujetti_reforme.label()),
                e_invoicing: label(flags.e_invoicing.label()),
                e_reporting_transaction: label(flags.e_reporting_transaction.label()),
                e_reporting_paiement: label(flags.e_reporting_paiement.label()),
                pa_emission: label(flags.pa_emission.label()),
                pa_reception: label(flags.pa_reception.label()),
                niveau_obligation: label(derived.obligation_score.level.label()),
            },
            maturite_digitale: derived.maturity.level.label().to_string(),
            cartographie_client: derived.cartographie.label().to_string(),
        }
    }

    /// True when the stored derived copy on `client` already equals this patch.
    pub fn matches(&self, client: &Client) -> bool {
        client.obligations_legales == self.obligations_legales
            && client.maturite_digitale.as_deref() == Some(self.maturite_digitale.as_str())
            && client.cartographie_client.as_deref() == Some(self.cartographie_client.as_str())
    }

    /// Overwrite the derived fields of `client`; raw fields are left alone.
    pub fn apply_to(&self, client: &mut Client) {
        client.obligations_legales = self.obligations_legales.clone();
        client.maturite_digitale = Some(self.maturite_digitale.clone());
        client.cartographie_client = Some(self.cartographie_client.clone());
    }

    pub fn to_merge_patch(&self) -> serde_json::Value {
        serde_json::json!({
            "obligationsLegales": {
                "assujettiReforme": self.obligations_legales.assujetti_reforme,
                "eInvoicing": self.obligations_legales.e_invoicing,
                "eReportingTransaction": self.obligations_legales.e_reporting_transaction,
                "eReportingPaiement": self.obligations_legales.e_reporting_paiement,
                "paEmission": self.obligations_legales.pa_emission,
                "paReception": self.obligations_legales.pa_reception,
                "niveauObligation": self.obligations_legales.niveau_obligation,
            },
            "maturiteDigitale": self.maturite_digitale,
            "cartographieClient": self.cartographie_client,
        })
    }
}

/// Result of comparing freshly derived values with a client's stored copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub derived: DerivedFields,
    /// `None` when the stored copy is already current.
    pub patch: Option<DerivedPatch>,
}

pub fn reconcile(client: &Client) -> Reconciliation {
    let derived = recompute(client);
    let patch = DerivedPatch::from_derived(&derived);
    let patch = if patch.matches(client) {
        None
    } else {
        Some(patch)
    };

    Reconciliation { derived, patch }
}
