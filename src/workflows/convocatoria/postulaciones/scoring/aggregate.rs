use std::collections::{BTreeMap, BTreeSet};

use super::super::domain::{Category, CriterionScore, ScoreValue};
use super::config::ScoringConfig;
use super::policy::recommend;
use super::{ScoreReport, ScoringError};

pub(crate) const MANUAL_SCALE_MAX: f64 = 4.0;
pub(crate) const AI_SCALE_MAX: f64 = 100.0;

/// Validate a single score against its own scale. Called at every boundary
/// that accepts scores so nothing out of range is ever persisted.
pub fn validate(score: &CriterionScore) -> Result<(), ScoringError> {
    match score.value {
        ScoreValue::Manual { raw } => {
            if raw < 1 || f64::from(raw) > MANUAL_SCALE_MAX {
                return Err(ScoringError::ManualScoreOutOfRange {
                    criterion_id: score.criterion_id.clone(),
                    raw,
                });
            }
        }
        ScoreValue::Ai { raw, confidence } => {
            if !(0.0..=AI_SCALE_MAX).contains(&raw) {
                return Err(ScoringError::AiScoreOutOfRange {
                    criterion_id: score.criterion_id.clone(),
                    raw,
                });
            }
            if !(0.0..=1.0).contains(&confidence) {
                return Err(ScoringError::ConfidenceOutOfRange {
                    criterion_id: score.criterion_id.clone(),
                    confidence,
                });
            }
        }
    }
    Ok(())
}

/// Normalize a validated score to the 0-100 scale. The variant carries the
/// scale, so there is no guessing.
pub(crate) fn normalize(value: &ScoreValue) -> f64 {
    match value {
        ScoreValue::Manual { raw } => f64::from(*raw) / MANUAL_SCALE_MAX * AI_SCALE_MAX,
        ScoreValue::Ai { raw, .. } => *raw,
    }
}

/// Aggregate a snapshot of criterion scores into category subtotals, a total,
/// and a recommendation.
///
/// Categories without any scored criterion are excluded from the total's
/// denominator rather than counted as zero, so partially evaluated
/// postulaciones are not diluted. An empty snapshot is a valid degenerate
/// case: total 0, recommendation pendiente.
pub fn score_evaluation(
    scores: &[CriterionScore],
    weights: &BTreeMap<String, f64>,
    config: &ScoringConfig,
) -> Result<ScoreReport, ScoringError> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut weighted_sums: BTreeMap<Category, (f64, f64)> = BTreeMap::new();
    let mut low_confidence = Vec::new();

    for score in scores {
        validate(score)?;
        if !seen.insert(score.criterion_id.as_str()) {
            return Err(ScoringError::DuplicateCriterion {
                criterion_id: score.criterion_id.clone(),
            });
        }

        let weight = weights.get(&score.criterion_id).copied().unwrap_or(1.0);
        if weight <= 0.0 {
            return Err(ScoringError::InvalidWeight {
                criterion_id: score.criterion_id.clone(),
                weight,
            });
        }

        if let ScoreValue::Ai { confidence, .. } = score.value {
            if confidence < config.min_ai_confidence {
                low_confidence.push(score.criterion_id.clone());
            }
        }

        let normalized = normalize(&score.value);
        let entry = weighted_sums.entry(score.category).or_insert((0.0, 0.0));
        entry.0 += normalized * weight;
        entry.1 += weight;
    }

    let per_category: BTreeMap<Category, f64> = weighted_sums
        .into_iter()
        .map(|(category, (sum, total_weight))| (category, sum / total_weight))
        .collect();

    let total = if per_category.is_empty() {
        0.0
    } else {
        per_category.values().sum::<f64>() / per_category.len() as f64
    };

    let recommendation = recommend(total, !per_category.is_empty(), config);

    Ok(ScoreReport {
        per_category,
        total,
        recommendation,
        low_confidence,
    })
}
