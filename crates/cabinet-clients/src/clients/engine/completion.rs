use super::super::domain::Client;

const FIELDS_WEIGHT: f32 = 50.0;
const OBLIGATIONS_WEIGHT: f32 = 25.0;
const QUESTIONNAIRE_WEIGHT: f32 = 25.0;

/// Raw identity, contact, mission and activity fields tracked for completion.
pub fn tracked_fields(client: &Client) -> [&str; 15] {
    [
        &client.identifiant_interne,
        &client.siren,
        &client.raison_sociale,
        &client.forme_juridique,
        &client.contact_principal.nom,
        &client.contact_principal.prenom,
        &client.contact_principal.email,
        &client.missions_actuelles.collaborateur_referent,
        &client.missions_actuelles.expert_comptable,
        &client.missions_actuelles.type_mission,
        &client.activites.code_ape,
        &client.activites.secteur_activites,
        &client.activites.regime_tva,
        &client.activites.regime_fiscal,
        &client.activites.typologie_clientele,
    ]
}

/// Profile completion in percent: half from the tracked fields, a quarter each
/// from defined obligations and a completed questionnaire.
pub fn percentage(client: &Client, obligations_defined: bool, questionnaire_complete: bool) -> f32 {
    let fields = tracked_fields(client);
    let filled = fields
        .iter()
        .filter(|value| !value.trim().is_empty())
        .count();

    let fields_progress = filled as f32 / fields.len() as f32 * FIELDS_WEIGHT;
    let obligations_progress = if obligations_defined {
        OBLIGATIONS_WEIGHT
    } else {
        0.0
    };
    let questionnaire_progress = if questionnaire_complete {
        QUESTIONNAIRE_WEIGHT
    } else {
        0.0
    };

    (fields_progress + obligations_progress + questionnaire_progress).clamp(0.0, 100.0)
}
