//! Postulación intake, scoring, and the evaluation workflow around the
//! score aggregator.

pub mod domain;
pub mod intake;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AiScoreInput, Answer, Category, ConvocatoriaId, Criterion, CriterionScore, EvaluationStatus,
    ManualScoreInput, Postulacion, PostulacionId, PostulacionStatus, PostulacionSubmission,
    Recommendation, ScoreValue, StartupProfile,
};
pub use intake::{IntakeGuard, IntakeViolation};
pub use repository::{
    DecisionNotice, EvaluationRecord, InMemoryPostulacionRepository, NotificationPublisher,
    NotifyError, PostulacionRecord, PostulacionRepository, PostulacionStatusView, RepositoryError,
    TracingNotifier,
};
pub use router::postulacion_router;
pub use scoring::{
    reconcile, score_evaluation, ScoreAggregator, ScoreReport, ScoringConfig, ScoringError,
};
pub use service::{PostulacionService, PostulacionServiceError};
