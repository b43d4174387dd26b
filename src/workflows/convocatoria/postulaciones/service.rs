use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;

use super::super::catalog::Convocatoria;
use super::domain::{
    AiScoreInput, Answer, CriterionScore, EvaluationStatus, ManualScoreInput, Postulacion,
    PostulacionId, PostulacionStatus, PostulacionSubmission, Recommendation, ScoreValue,
};
use super::intake::{IntakeGuard, IntakeViolation};
use super::repository::{
    DecisionNotice, EvaluationRecord, NotificationPublisher, NotifyError, PostulacionRecord,
    PostulacionRepository, RepositoryError,
};
use super::scoring::{self, ScoreAggregator, ScoreReport, ScoringConfig, ScoringError};

/// Service composing the intake guard, repository, notifier, and score
/// aggregator for one convocatoria.
pub struct PostulacionService<R, N> {
    guard: Arc<IntakeGuard>,
    repository: Arc<R>,
    notifier: Arc<N>,
    aggregator: Arc<ScoreAggregator>,
    weights: BTreeMap<String, f64>,
}

static POSTULACION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_postulacion_id() -> PostulacionId {
    let id = POSTULACION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PostulacionId(format!("post-{id:06}"))
}

impl<R, N> PostulacionService<R, N>
where
    R: PostulacionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(
        convocatoria: Convocatoria,
        repository: Arc<R>,
        notifier: Arc<N>,
        config: ScoringConfig,
    ) -> Self {
        let weights = convocatoria
            .criteria()
            .iter()
            .map(|criterion| (criterion.id.clone(), criterion.weight))
            .collect();

        Self {
            guard: Arc::new(IntakeGuard::for_convocatoria(convocatoria)),
            repository,
            notifier,
            aggregator: Arc::new(ScoreAggregator::new(config)),
            weights,
        }
    }

    pub fn convocatoria(&self) -> &Convocatoria {
        self.guard.convocatoria()
    }

    /// Store a draft. Answers may still be partial; they are only checked
    /// against the rubric, not for completeness.
    pub fn create_draft(
        &self,
        submission: PostulacionSubmission,
    ) -> Result<PostulacionRecord, PostulacionServiceError> {
        self.guard.validate_draft_answers(&submission.answers)?;

        let record = PostulacionRecord {
            postulacion: Postulacion {
                id: next_postulacion_id(),
                convocatoria_id: self.convocatoria().id().clone(),
                startup: submission.startup,
                answers: submission.answers,
                submitted_on: None,
            },
            status: PostulacionStatus::Borrador,
            evaluation: None,
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Replace a draft's answers. Rejected once the postulación left the
    /// draft state: submitted answers are immutable.
    pub fn update_answers(
        &self,
        id: &PostulacionId,
        answers: Vec<Answer>,
    ) -> Result<PostulacionRecord, PostulacionServiceError> {
        let mut record = self.fetch_record(id)?;
        if record.status != PostulacionStatus::Borrador {
            return Err(PostulacionServiceError::AnswersFrozen {
                status: record.status.label(),
            });
        }

        self.guard.validate_draft_answers(&answers)?;
        record.postulacion.answers = answers;
        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Promote a draft to a submitted postulación after the full intake
    /// check.
    pub fn submit_draft(
        &self,
        id: &PostulacionId,
        today: NaiveDate,
    ) -> Result<PostulacionRecord, PostulacionServiceError> {
        let mut record = self.fetch_record(id)?;
        if record.status != PostulacionStatus::Borrador {
            return Err(PostulacionServiceError::AlreadySubmitted {
                status: record.status.label(),
            });
        }

        let submission = PostulacionSubmission {
            startup: record.postulacion.startup.clone(),
            answers: record.postulacion.answers.clone(),
        };
        self.guard.validate_submission(&submission, today)?;

        record.status = PostulacionStatus::Enviada;
        record.postulacion.submitted_on = Some(today);
        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// One-shot intake: validate and store as submitted. Nothing persists on
    /// a validation failure.
    pub fn submit(
        &self,
        submission: PostulacionSubmission,
        today: NaiveDate,
    ) -> Result<PostulacionRecord, PostulacionServiceError> {
        self.guard.validate_submission(&submission, today)?;

        let record = PostulacionRecord {
            postulacion: Postulacion {
                id: next_postulacion_id(),
                convocatoria_id: self.convocatoria().id().clone(),
                startup: submission.startup,
                answers: submission.answers,
                submitted_on: Some(today),
            },
            status: PostulacionStatus::Enviada,
            evaluation: None,
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Record admin rubric scores (1-4). Upserts per criterion; the manual
    /// list later takes precedence over AI scores.
    pub fn record_manual_scores(
        &self,
        id: &PostulacionId,
        inputs: Vec<ManualScoreInput>,
    ) -> Result<PostulacionRecord, PostulacionServiceError> {
        let scores = inputs
            .into_iter()
            .map(|input| {
                self.criterion_score(
                    &input.criterion_id,
                    ScoreValue::Manual { raw: input.raw },
                    input.justification,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.record_scores(id, scores, ScorePath::Manual)
    }

    /// Record scores returned by the external AI provider (0-100 with
    /// confidence).
    pub fn record_ai_scores(
        &self,
        id: &PostulacionId,
        inputs: Vec<AiScoreInput>,
    ) -> Result<PostulacionRecord, PostulacionServiceError> {
        let scores = inputs
            .into_iter()
            .map(|input| {
                self.criterion_score(
                    &input.criterion_id,
                    ScoreValue::Ai {
                        raw: input.raw,
                        confidence: input.confidence,
                    },
                    input.justification,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.record_scores(id, scores, ScorePath::Ai)
    }

    /// Reconcile manual and AI scores, aggregate, and persist the outcome.
    ///
    /// The evaluation completes unless an AI score below the confidence
    /// floor survives reconciliation; in that case it stays in review so an
    /// admin can override the doubtful criteria.
    pub fn finalize(&self, id: &PostulacionId) -> Result<ScoreReport, PostulacionServiceError> {
        let mut record = self.fetch_record(id)?;
        if record.status == PostulacionStatus::Borrador {
            return Err(PostulacionServiceError::ScoreBeforeSubmit);
        }

        let mut evaluation = record.evaluation.take().unwrap_or_else(EvaluationRecord::empty);
        if evaluation.status == EvaluationStatus::Completed {
            return Err(PostulacionServiceError::EvaluationClosed);
        }

        let effective = scoring::reconcile(&evaluation.manual_scores, &evaluation.ai_scores);
        let report = self.aggregator.score(&effective, &self.weights)?;

        if report.is_confident() {
            evaluation.status = EvaluationStatus::Completed;
            record.status = match report.recommendation {
                Recommendation::Aprobado => PostulacionStatus::Aprobada,
                Recommendation::Rechazado => PostulacionStatus::Rechazada,
                Recommendation::Pendiente => PostulacionStatus::Evaluada,
            };
        } else {
            evaluation.status = EvaluationStatus::InReview;
            record.status = PostulacionStatus::EnRevision;
        }

        evaluation.report = Some(report.clone());
        record.evaluation = Some(evaluation);
        let final_status = record.status;
        self.repository.update(record)?;

        if matches!(
            final_status,
            PostulacionStatus::Aprobada | PostulacionStatus::Rechazada
        ) {
            let mut details = BTreeMap::new();
            details.insert(
                "recommendation".to_string(),
                report.recommendation.label().to_string(),
            );
            details.insert("total".to_string(), format!("{:.1}", report.total));
            self.notifier.publish(DecisionNotice {
                template: "decision_final".to_string(),
                postulacion_id: id.clone(),
                details,
            })?;
        }

        Ok(report)
    }

    /// Fetch a postulación with its current status for API responses.
    pub fn get(&self, id: &PostulacionId) -> Result<PostulacionRecord, PostulacionServiceError> {
        self.fetch_record(id)
    }

    /// All records of this convocatoria, for reporting.
    pub fn records(&self) -> Result<Vec<PostulacionRecord>, PostulacionServiceError> {
        let records = self.repository.by_convocatoria(self.convocatoria().id())?;
        Ok(records)
    }

    fn fetch_record(
        &self,
        id: &PostulacionId,
    ) -> Result<PostulacionRecord, PostulacionServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    fn criterion_score(
        &self,
        criterion_id: &str,
        value: ScoreValue,
        justification: String,
    ) -> Result<CriterionScore, PostulacionServiceError> {
        let criterion = self.convocatoria().criterion(criterion_id).ok_or_else(|| {
            PostulacionServiceError::UnknownCriterion {
                criterion_id: criterion_id.to_string(),
            }
        })?;

        let score = CriterionScore {
            criterion_id: criterion.id.clone(),
            category: criterion.category,
            value,
            justification,
        };
        scoring::validate(&score)?;
        Ok(score)
    }

    fn record_scores(
        &self,
        id: &PostulacionId,
        scores: Vec<CriterionScore>,
        path: ScorePath,
    ) -> Result<PostulacionRecord, PostulacionServiceError> {
        let mut record = self.fetch_record(id)?;
        if record.status == PostulacionStatus::Borrador {
            return Err(PostulacionServiceError::ScoreBeforeSubmit);
        }

        let mut evaluation = record.evaluation.take().unwrap_or_else(EvaluationRecord::empty);
        if evaluation.status == EvaluationStatus::Completed {
            return Err(PostulacionServiceError::EvaluationClosed);
        }

        let target = match path {
            ScorePath::Manual => &mut evaluation.manual_scores,
            ScorePath::Ai => &mut evaluation.ai_scores,
        };
        for score in scores {
            match target
                .iter_mut()
                .find(|existing| existing.criterion_id == score.criterion_id)
            {
                Some(existing) => *existing = score,
                None => target.push(score),
            }
        }

        evaluation.status = EvaluationStatus::InReview;
        record.evaluation = Some(evaluation);
        record.status = PostulacionStatus::EnRevision;
        self.repository.update(record.clone())?;
        Ok(record)
    }
}

enum ScorePath {
    Manual,
    Ai,
}

/// Error raised by the postulación service.
#[derive(Debug, thiserror::Error)]
pub enum PostulacionServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
    #[error("score references unknown criterion '{criterion_id}'")]
    UnknownCriterion { criterion_id: String },
    #[error("answers are immutable once the postulación is {status}")]
    AnswersFrozen { status: &'static str },
    #[error("postulación is already {status}")]
    AlreadySubmitted { status: &'static str },
    #[error("postulación has not been submitted yet")]
    ScoreBeforeSubmit,
    #[error("evaluation is already completed")]
    EvaluationClosed,
}
