use serde::{Deserialize, Serialize};

use super::super::domain::{MaturityLevel, Questionnaire};

/// Upper bound of the "Faible" band.
const LOW_MAX: i16 = 6;
/// Lower bound of the "Élevée" band.
const HIGH_MIN: i16 = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaturityScore {
    pub score: i16,
    pub level: MaturityLevel,
}

fn yes(answer: Option<&str>, points: i16) -> i16 {
    if answer == Some("Oui") {
        points
    } else {
        0
    }
}

pub fn score(questionnaire: &Questionnaire) -> MaturityScore {
    if questionnaire.is_untouched() {
        return MaturityScore {
            score: 0,
            level: MaturityLevel::ADefinir,
        };
    }

    let mut score = 0;
    score += yes(questionnaire.q4.as_deref(), 2);
    score += yes(questionnaire.q5.as_deref(), 2);
    score += yes(questionnaire.q6.as_deref(), 3);
    score += yes(questionnaire.q7.as_deref(), 2);
    score += yes(questionnaire.q8.as_deref(), 3);

    score += match questionnaire.q9.as_deref() {
        Some("digital") => 1,
        Some("mixed") => -1,
        Some("paper") => -2,
        _ => 0,
    };

    score += match questionnaire.q11.as_deref() {
        Some("platform") => 2,
        Some("papier") => -2,
        _ => 0,
    };

    score += yes(questionnaire.q12.as_deref(), 2);

    let level = match score {
        s if s <= LOW_MAX => MaturityLevel::Faible,
        s if s < HIGH_MIN => MaturityLevel::Intermediaire,
        _ => MaturityLevel::Elevee,
    };

    MaturityScore { score, level }
}
