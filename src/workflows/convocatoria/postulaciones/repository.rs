use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::domain::{
    ConvocatoriaId, CriterionScore, EvaluationStatus, Postulacion, PostulacionId,
    PostulacionStatus,
};
use super::scoring::ScoreReport;

/// Evaluation state attached to a postulación. Manual and AI scores coexist;
/// the manual list takes precedence at aggregation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub status: EvaluationStatus,
    pub manual_scores: Vec<CriterionScore>,
    pub ai_scores: Vec<CriterionScore>,
    pub report: Option<ScoreReport>,
}

impl EvaluationRecord {
    pub fn empty() -> Self {
        Self {
            status: EvaluationStatus::Pending,
            manual_scores: Vec::new(),
            ai_scores: Vec::new(),
            report: None,
        }
    }
}

/// Repository record: the postulación plus status and evaluation metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostulacionRecord {
    pub postulacion: Postulacion,
    pub status: PostulacionStatus,
    pub evaluation: Option<EvaluationRecord>,
}

impl PostulacionRecord {
    pub fn decision_rationale(&self) -> String {
        match self.evaluation.as_ref().and_then(|ev| ev.report.as_ref()) {
            Some(report) => format!(
                "{} (total {:.1})",
                report.recommendation.summary(),
                report.total
            ),
            None => "evaluación pendiente".to_string(),
        }
    }

    pub fn total_score(&self) -> Option<f64> {
        self.evaluation
            .as_ref()
            .and_then(|ev| ev.report.as_ref())
            .map(|report| report.total)
    }

    pub fn status_view(&self) -> PostulacionStatusView {
        PostulacionStatusView {
            postulacion_id: self.postulacion.id.clone(),
            startup: self.postulacion.startup.nombre.clone(),
            status: self.status.label(),
            decision_rationale: self.decision_rationale(),
            total_score: self.total_score(),
        }
    }
}

/// Sanitized representation of a postulación's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct PostulacionStatusView {
    pub postulacion_id: PostulacionId,
    pub startup: String,
    pub status: &'static str,
    pub decision_rationale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_score: Option<f64>,
}

/// Storage abstraction so the service can be exercised in isolation and the
/// binary can swap backends without touching workflow code.
pub trait PostulacionRepository: Send + Sync {
    fn insert(&self, record: PostulacionRecord) -> Result<PostulacionRecord, RepositoryError>;
    fn update(&self, record: PostulacionRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &PostulacionId) -> Result<Option<PostulacionRecord>, RepositoryError>;
    fn by_convocatoria(
        &self,
        id: &ConvocatoriaId,
    ) -> Result<Vec<PostulacionRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook fired when a postulación reaches a final decision.
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notice: DecisionNotice) -> Result<(), NotifyError>;
}

/// Decision payload handed to notification adapters (e-mail, dashboard).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionNotice {
    pub template: String,
    pub postulacion_id: PostulacionId,
    pub details: BTreeMap<String, String>,
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Mutex-backed repository used by the server binary, the demo command, and
/// tests. Production deployments provide a database-backed implementation of
/// the same trait.
#[derive(Default, Clone)]
pub struct InMemoryPostulacionRepository {
    records: Arc<Mutex<HashMap<PostulacionId, PostulacionRecord>>>,
}

impl PostulacionRepository for InMemoryPostulacionRepository {
    fn insert(&self, record: PostulacionRecord) -> Result<PostulacionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.postulacion.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.postulacion.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: PostulacionRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.postulacion.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &PostulacionId) -> Result<Option<PostulacionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn by_convocatoria(
        &self,
        id: &ConvocatoriaId,
    ) -> Result<Vec<PostulacionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<PostulacionRecord> = guard
            .values()
            .filter(|record| &record.postulacion.convocatoria_id == id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.postulacion.id.cmp(&b.postulacion.id));
        Ok(records)
    }
}

/// Publisher that logs decisions instead of delivering them; the default for
/// local serving and demos.
#[derive(Default, Clone)]
pub struct TracingNotifier;

impl NotificationPublisher for TracingNotifier {
    fn publish(&self, notice: DecisionNotice) -> Result<(), NotifyError> {
        tracing::info!(
            template = %notice.template,
            postulacion = %notice.postulacion_id.0,
            "decision notice"
        );
        Ok(())
    }
}
