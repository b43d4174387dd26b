use std::collections::BTreeMap;

use super::common::*;
use crate::workflows::convocatoria::postulaciones::domain::{
    Category, CriterionScore, Recommendation, ScoreValue,
};
use crate::workflows::convocatoria::postulaciones::scoring::{
    ai_score, manual_score, reconcile, score_evaluation, ScoringError,
};

fn no_weights() -> BTreeMap<String, f64> {
    BTreeMap::new()
}

fn full_manual_set(raw: u8) -> Vec<CriterionScore> {
    convocatoria()
        .criteria()
        .iter()
        .map(|criterion| manual_score(&criterion.id, criterion.category, raw, "rúbrica"))
        .collect()
}

#[test]
fn all_max_manual_scores_reach_total_100() {
    let report = score_evaluation(&full_manual_set(4), &no_weights(), &scoring_config())
        .expect("valid snapshot");

    assert_eq!(report.per_category.len(), 4);
    for category in Category::ALL {
        assert_eq!(report.per_category.get(&category), Some(&100.0));
    }
    assert_eq!(report.total, 100.0);
    assert_eq!(report.recommendation, Recommendation::Aprobado);
}

#[test]
fn all_min_manual_scores_land_at_25_and_reject() {
    let report = score_evaluation(&full_manual_set(1), &no_weights(), &scoring_config())
        .expect("valid snapshot");

    assert_eq!(report.total, 25.0);
    assert_eq!(report.recommendation, Recommendation::Rechazado);
}

#[test]
fn ai_zero_scores_reject() {
    let scores = vec![
        ai_score("complejidad-problema", Category::Complejidad, 0.0, 0.9, ""),
        ai_score("mercado-tamano", Category::Mercado, 0.0, 0.9, ""),
    ];

    let report =
        score_evaluation(&scores, &no_weights(), &scoring_config()).expect("valid snapshot");

    assert_eq!(report.total, 0.0);
    assert_eq!(report.recommendation, Recommendation::Rechazado);
}

#[test]
fn empty_snapshot_is_pendiente_never_rechazado() {
    let report =
        score_evaluation(&[], &no_weights(), &scoring_config()).expect("empty set is valid");

    assert!(report.per_category.is_empty());
    assert_eq!(report.total, 0.0);
    assert_eq!(report.recommendation, Recommendation::Pendiente);
}

#[test]
fn unscored_categories_do_not_dilute_the_total() {
    let scores = vec![
        manual_score("complejidad-problema", Category::Complejidad, 4, ""),
        manual_score("complejidad-solucion", Category::Complejidad, 4, ""),
        manual_score("mercado-tamano", Category::Mercado, 2, ""),
    ];

    let report =
        score_evaluation(&scores, &no_weights(), &scoring_config()).expect("valid snapshot");

    assert_eq!(report.per_category.len(), 2);
    assert_eq!(
        report.per_category.get(&Category::Complejidad),
        Some(&100.0)
    );
    assert_eq!(report.per_category.get(&Category::Mercado), Some(&50.0));
    // Mean of the two present categories, not of four.
    assert_eq!(report.total, 75.0);
}

#[test]
fn manual_and_rescaled_ai_snapshots_agree() {
    let manual: Vec<CriterionScore> = convocatoria()
        .criteria()
        .iter()
        .enumerate()
        .map(|(index, criterion)| {
            let raw = (index % 4 + 1) as u8;
            manual_score(&criterion.id, criterion.category, raw, "")
        })
        .collect();

    let rescaled: Vec<CriterionScore> = manual
        .iter()
        .map(|score| {
            let raw = match score.value {
                ScoreValue::Manual { raw } => f64::from(raw) / 4.0 * 100.0,
                ScoreValue::Ai { .. } => unreachable!("manual set"),
            };
            ai_score(&score.criterion_id, score.category, raw, 1.0, "")
        })
        .collect();

    let config = scoring_config();
    let manual_report = score_evaluation(&manual, &no_weights(), &config).expect("valid");
    let ai_report = score_evaluation(&rescaled, &no_weights(), &config).expect("valid");

    assert_eq!(manual_report.total, ai_report.total);
    assert_eq!(manual_report.per_category, ai_report.per_category);
    assert_eq!(manual_report.recommendation, ai_report.recommendation);
}

#[test]
fn aggregation_is_idempotent() {
    let scores = full_manual_set(3);
    let config = scoring_config();

    let first = score_evaluation(&scores, &no_weights(), &config).expect("valid");
    let second = score_evaluation(&scores, &no_weights(), &config).expect("valid");

    assert_eq!(first, second);
}

#[test]
fn weights_shift_the_category_subtotal() {
    let scores = vec![
        manual_score("complejidad-problema", Category::Complejidad, 4, ""),
        manual_score("complejidad-solucion", Category::Complejidad, 2, ""),
    ];
    let mut weights = no_weights();
    weights.insert("complejidad-problema".to_string(), 3.0);

    let report = score_evaluation(&scores, &weights, &scoring_config()).expect("valid");

    // (100*3 + 50*1) / 4
    assert_eq!(
        report.per_category.get(&Category::Complejidad),
        Some(&87.5)
    );
}

#[test]
fn out_of_range_scores_fail_closed() {
    let config = scoring_config();

    let low = vec![manual_score("complejidad-problema", Category::Complejidad, 0, "")];
    assert!(matches!(
        score_evaluation(&low, &no_weights(), &config),
        Err(ScoringError::ManualScoreOutOfRange { .. })
    ));

    let high = vec![manual_score("complejidad-problema", Category::Complejidad, 5, "")];
    assert!(matches!(
        score_evaluation(&high, &no_weights(), &config),
        Err(ScoringError::ManualScoreOutOfRange { .. })
    ));

    let ai_high = vec![ai_score("mercado-tamano", Category::Mercado, 101.0, 0.9, "")];
    assert!(matches!(
        score_evaluation(&ai_high, &no_weights(), &config),
        Err(ScoringError::AiScoreOutOfRange { .. })
    ));

    let ai_negative = vec![ai_score("mercado-tamano", Category::Mercado, -1.0, 0.9, "")];
    assert!(matches!(
        score_evaluation(&ai_negative, &no_weights(), &config),
        Err(ScoringError::AiScoreOutOfRange { .. })
    ));

    let confidence = vec![ai_score("mercado-tamano", Category::Mercado, 50.0, 1.5, "")];
    assert!(matches!(
        score_evaluation(&confidence, &no_weights(), &config),
        Err(ScoringError::ConfidenceOutOfRange { .. })
    ));
}

#[test]
fn duplicate_criterion_in_a_snapshot_is_rejected() {
    let scores = vec![
        manual_score("equipo-fundadores", Category::Equipo, 3, ""),
        manual_score("equipo-fundadores", Category::Equipo, 4, ""),
    ];

    assert!(matches!(
        score_evaluation(&scores, &no_weights(), &scoring_config()),
        Err(ScoringError::DuplicateCriterion { .. })
    ));
}

#[test]
fn non_positive_weight_is_rejected() {
    let scores = vec![manual_score("equipo-fundadores", Category::Equipo, 3, "")];
    let mut weights = no_weights();
    weights.insert("equipo-fundadores".to_string(), 0.0);

    assert!(matches!(
        score_evaluation(&scores, &weights, &scoring_config()),
        Err(ScoringError::InvalidWeight { .. })
    ));
}

#[test]
fn reconcile_prefers_manual_over_ai() {
    let manual = vec![manual_score("equipo-fundadores", Category::Equipo, 4, "admin")];
    let ai = vec![
        ai_score("equipo-fundadores", Category::Equipo, 10.0, 0.9, "ia"),
        ai_score("equipo-dedicacion", Category::Equipo, 80.0, 0.9, "ia"),
    ];

    let effective = reconcile(&manual, &ai);

    assert_eq!(effective.len(), 2);
    let fundadores = effective
        .iter()
        .find(|score| score.criterion_id == "equipo-fundadores")
        .expect("present");
    assert!(matches!(fundadores.value, ScoreValue::Manual { raw: 4 }));
    assert!(effective
        .iter()
        .any(|score| score.criterion_id == "equipo-dedicacion"));
}

#[test]
fn low_confidence_ai_scores_are_flagged_but_counted() {
    let scores = vec![
        ai_score("mercado-tamano", Category::Mercado, 90.0, 0.3, ""),
        ai_score("mercado-clientes", Category::Mercado, 90.0, 0.9, ""),
    ];

    let report =
        score_evaluation(&scores, &no_weights(), &scoring_config()).expect("valid snapshot");

    assert_eq!(report.per_category.get(&Category::Mercado), Some(&90.0));
    assert_eq!(report.low_confidence, vec!["mercado-tamano".to_string()]);
    assert!(!report.is_confident());
}
