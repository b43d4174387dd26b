use serde::{Deserialize, Serialize};

/// Thresholds governing the recommendation policy.
///
/// The 70/40 cut-offs reproduce the historical score/label pairings of the
/// program's fixtures; they are deployment configuration, not a published
/// rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Totals at or above this mark are recommended `aprobado`.
    pub approve_threshold: f64,
    /// Totals strictly below this mark are recommended `rechazado`.
    pub reject_threshold: f64,
    /// AI scores below this confidence keep the evaluation in review until an
    /// admin overrides them.
    pub min_ai_confidence: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            approve_threshold: 70.0,
            reject_threshold: 40.0,
            min_ai_confidence: 0.5,
        }
    }
}
