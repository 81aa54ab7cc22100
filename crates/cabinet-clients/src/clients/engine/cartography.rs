use super::super::domain::{Cartographie, MaturityLevel, ObligationLevel};

pub fn classify(maturity: MaturityLevel, obligation: ObligationLevel) -> Cartographie {
    use Cartographie::*;

    let constrained = matches!(
        obligation,
        ObligationLevel::Fortes | ObligationLevel::Intermediaire
    );

    match (maturity, obligation) {
        (MaturityLevel::Faible, _) if constrained => RisqueNonConformite,
        (MaturityLevel::Intermediaire, _) if constrained => OpportunitesEmergentes,
        (MaturityLevel::Elevee, _) if constrained => InnovantsSousObligations,
        (MaturityLevel::Elevee, ObligationLevel::Faibles) => InnovantsStrategiques,
        (MaturityLevel::Faible | MaturityLevel::Intermediaire, ObligationLevel::Faibles) => {
            OpportunitesEmergentes
        }
        _ => ADefinir,
    }
}
