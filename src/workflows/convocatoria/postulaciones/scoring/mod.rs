//! Score aggregation: the pure core turning a snapshot of criterion scores
//! into category subtotals, a weighted total, and a recommendation.

mod aggregate;
mod config;
mod policy;

pub use aggregate::{score_evaluation, validate};
pub use config::ScoringConfig;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{Category, CriterionScore, Recommendation, ScoreValue};

/// Stateless aggregator applying one scoring configuration.
pub struct ScoreAggregator {
    config: ScoringConfig,
}

impl ScoreAggregator {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(
        &self,
        scores: &[CriterionScore],
        weights: &BTreeMap<String, f64>,
    ) -> Result<ScoreReport, ScoringError> {
        aggregate::score_evaluation(scores, weights, &self.config)
    }
}

/// Pick the effective score per criterion: a manual score always overrides
/// the AI score for the same criterion; AI fills the rest.
pub fn reconcile(manual: &[CriterionScore], ai: &[CriterionScore]) -> Vec<CriterionScore> {
    let mut merged: Vec<CriterionScore> = manual.to_vec();
    for score in ai {
        if !merged
            .iter()
            .any(|existing| existing.criterion_id == score.criterion_id)
        {
            merged.push(score.clone());
        }
    }
    merged
}

/// Aggregation result for one evaluation snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// 0-100 subtotal per category with at least one scored criterion.
    pub per_category: BTreeMap<Category, f64>,
    /// 0-100 mean of the present category subtotals.
    pub total: f64,
    pub recommendation: Recommendation,
    /// Criteria whose effective score is an AI score below the confidence
    /// floor; these keep the evaluation open for manual review.
    pub low_confidence: Vec<String>,
}

impl ScoreReport {
    /// True when every effective score meets the confidence floor.
    pub fn is_confident(&self) -> bool {
        self.low_confidence.is_empty()
    }
}

/// Validation failure for a score snapshot. Fails closed: the evaluation is
/// rejected and nothing is persisted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("manual score {raw} for '{criterion_id}' outside the 1-4 rubric")]
    ManualScoreOutOfRange { criterion_id: String, raw: u8 },
    #[error("AI score {raw} for '{criterion_id}' outside the 0-100 scale")]
    AiScoreOutOfRange { criterion_id: String, raw: f64 },
    #[error("confidence {confidence} for '{criterion_id}' outside 0-1")]
    ConfidenceOutOfRange { criterion_id: String, confidence: f64 },
    #[error("criterion '{criterion_id}' scored more than once")]
    DuplicateCriterion { criterion_id: String },
    #[error("criterion '{criterion_id}' has non-positive weight {weight}")]
    InvalidWeight { criterion_id: String, weight: f64 },
}

/// Convenience constructor for building criterion scores.
pub fn manual_score(
    criterion_id: impl Into<String>,
    category: Category,
    raw: u8,
    justification: impl Into<String>,
) -> CriterionScore {
    CriterionScore {
        criterion_id: criterion_id.into(),
        category,
        value: ScoreValue::Manual { raw },
        justification: justification.into(),
    }
}

/// Convenience constructor for building criterion scores.
pub fn ai_score(
    criterion_id: impl Into<String>,
    category: Category,
    raw: f64,
    confidence: f64,
    justification: impl Into<String>,
) -> CriterionScore {
    CriterionScore {
        criterion_id: criterion_id.into(),
        category,
        value: ScoreValue::Ai { raw, confidence },
        justification: justification.into(),
    }
}
