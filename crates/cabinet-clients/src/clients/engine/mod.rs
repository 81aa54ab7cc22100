//! Derived attributes of a client record.
//!
//! Every computation here is a total, pure function of the client's raw fields
//! and questionnaire answers. `recompute` runs the whole pipeline in dependency
//! order: obligations, obligation score, maturity, cartography, completion.

pub mod cartography;
pub mod completion;
pub mod maturity;
pub mod obligations;

pub use maturity::MaturityScore;
pub use obligations::{ObligationFlags, ObligationScore};

use serde::{Deserialize, Serialize};

use super::domain::{Cartographie, Client};

/// Output of one recomputation pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedFields {
    pub obligations: ObligationFlags,
    pub obligation_score: ObligationScore,
    pub maturity: MaturityScore,
    pub cartographie: Cartographie,
    pub questionnaire_complete: bool,
    pub completion_pct: f32,
}

impl DerivedFields {
    /// Every flag and the obligation level carry a decided value.
    pub fn obligations_defined(&self) -> bool {
        self.obligations.all().iter().all(|flag| flag.is_defined())
            && self.obligation_score.level.is_defined()
    }
}

pub fn recompute(client: &Client) -> DerivedFields {
    let regime = client.regime_tva();
    let typologie = client.typologie_clientele();

    let obligations = obligations::classify(regime, typologie);
    let obligation_score = obligations::score(regime, typologie);
    let maturity = maturity::score(&client.questionnaire);
    let cartographie = cartography::classify(maturity.level, obligation_score.level);
    let questionnaire_complete = client.questionnaire.is_complete();

    let mut derived = DerivedFields {
        obligations,
        obligation_score,
        maturity,
        cartographie,
        questionnaire_complete,
        completion_pct: 0.0,
    };
    derived.completion_pct = completion::percentage(
        client,
        derived.obligations_defined(),
        questionnaire_complete,
    );
    derived
}
