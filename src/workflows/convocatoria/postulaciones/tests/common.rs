use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::convocatoria::catalog::Convocatoria;
use crate::workflows::convocatoria::fixtures;
use crate::workflows::convocatoria::postulaciones::domain::{
    ConvocatoriaId, PostulacionId, PostulacionSubmission,
};
use crate::workflows::convocatoria::postulaciones::repository::{
    DecisionNotice, InMemoryPostulacionRepository, NotificationPublisher, NotifyError,
    PostulacionRecord, PostulacionRepository, RepositoryError,
};
use crate::workflows::convocatoria::postulaciones::scoring::ScoringConfig;
use crate::workflows::convocatoria::postulaciones::{postulacion_router, PostulacionService};

pub(super) fn convocatoria() -> Convocatoria {
    fixtures::convocatoria_demo()
}

pub(super) fn today() -> NaiveDate {
    fixtures::demo_today()
}

pub(super) fn scoring_config() -> ScoringConfig {
    ScoringConfig::default()
}

pub(super) fn submission() -> PostulacionSubmission {
    fixtures::sensorgrid()
}

pub(super) fn weak_submission() -> PostulacionSubmission {
    fixtures::quickfix_app()
}

pub(super) fn build_service() -> (
    PostulacionService<InMemoryPostulacionRepository, MemoryNotifier>,
    Arc<InMemoryPostulacionRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(InMemoryPostulacionRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = PostulacionService::new(
        convocatoria(),
        repository.clone(),
        notifier.clone(),
        scoring_config(),
    );
    (service, repository, notifier)
}

pub(super) fn postulacion_router_with_service(
    service: PostulacionService<InMemoryPostulacionRepository, MemoryNotifier>,
) -> axum::Router {
    postulacion_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<DecisionNotice>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<DecisionNotice> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryNotifier {
    fn publish(&self, notice: DecisionNotice) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct ConflictRepository;

impl PostulacionRepository for ConflictRepository {
    fn insert(&self, _record: PostulacionRecord) -> Result<PostulacionRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: PostulacionRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &PostulacionId) -> Result<Option<PostulacionRecord>, RepositoryError> {
        Ok(None)
    }

    fn by_convocatoria(
        &self,
        _id: &ConvocatoriaId,
    ) -> Result<Vec<PostulacionRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl PostulacionRepository for UnavailableRepository {
    fn insert(&self, _record: PostulacionRecord) -> Result<PostulacionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: PostulacionRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &PostulacionId) -> Result<Option<PostulacionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn by_convocatoria(
        &self,
        _id: &ConvocatoriaId,
    ) -> Result<Vec<PostulacionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn assert_conflict_response(response: Response) {
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
