use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for postulaciones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PostulacionId(pub String);

/// Identifier wrapper for convocatorias.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConvocatoriaId(pub String);

/// The four fixed rubric categories. Closed on purpose: an unknown category
/// cannot exist past the serde boundary, so scoring never silently drops one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Complejidad,
    Mercado,
    Escalabilidad,
    Equipo,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Complejidad,
        Category::Mercado,
        Category::Escalabilidad,
        Category::Equipo,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Category::Complejidad => "complejidad",
            Category::Mercado => "mercado",
            Category::Escalabilidad => "escalabilidad",
            Category::Equipo => "equipo",
        }
    }
}

/// One evaluation question of the rubric. Frozen once the convocatoria is
/// published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: String,
    pub category: Category,
    pub prompt: String,
    /// One-line 1-4 scoring guide shown to manual reviewers.
    pub rubric: String,
    pub weight: f64,
    pub required: bool,
}

/// Applicant answer to a single criterion. Mutable only while the
/// postulación is still a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub criterion_id: String,
    pub text: String,
    pub order: u16,
}

/// Identity snapshot of the startup behind a postulación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupProfile {
    pub nombre: String,
    pub sector: String,
    pub resumen: String,
}

/// Payload an applicant sends when creating or submitting a postulación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostulacionSubmission {
    pub startup: StartupProfile,
    pub answers: Vec<Answer>,
}

/// A startup's submission to a convocatoria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Postulacion {
    pub id: PostulacionId,
    pub convocatoria_id: ConvocatoriaId,
    pub startup: StartupProfile,
    pub answers: Vec<Answer>,
    pub submitted_on: Option<NaiveDate>,
}

/// Lifecycle of a postulación, driven by submission and evaluation events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostulacionStatus {
    Borrador,
    Enviada,
    EnRevision,
    Evaluada,
    Aprobada,
    Rechazada,
}

impl PostulacionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PostulacionStatus::Borrador => "borrador",
            PostulacionStatus::Enviada => "enviada",
            PostulacionStatus::EnRevision => "en_revision",
            PostulacionStatus::Evaluada => "evaluada",
            PostulacionStatus::Aprobada => "aprobada",
            PostulacionStatus::Rechazada => "rechazada",
        }
    }
}

/// Origin and raw value of a criterion score. The variant carries its own
/// scale so normalization pattern-matches the source instead of guessing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum ScoreValue {
    /// Admin rubric score on the 1-4 scale.
    Manual { raw: u8 },
    /// External AI score, already on the 0-100 scale.
    Ai { raw: f64, confidence: f64 },
}

/// A scored criterion, from either scoring path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub criterion_id: String,
    pub category: Category,
    pub value: ScoreValue,
    pub justification: String,
}

/// Coarse outcome derived from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Aprobado,
    Rechazado,
    Pendiente,
}

impl Recommendation {
    pub const fn label(self) -> &'static str {
        match self {
            Recommendation::Aprobado => "aprobado",
            Recommendation::Rechazado => "rechazado",
            Recommendation::Pendiente => "pendiente",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            Recommendation::Aprobado => "postulación aprobada",
            Recommendation::Rechazado => "postulación rechazada",
            Recommendation::Pendiente => "pendiente de revisión",
        }
    }
}

/// Evaluation lifecycle; terminal once completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationStatus {
    Pending,
    InReview,
    Completed,
}

impl EvaluationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EvaluationStatus::Pending => "pending",
            EvaluationStatus::InReview => "in_review",
            EvaluationStatus::Completed => "completed",
        }
    }
}

/// Manual rubric score as submitted by an admin reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualScoreInput {
    pub criterion_id: String,
    pub raw: u8,
    pub justification: String,
}

/// Per-criterion score returned by the external AI scoring provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiScoreInput {
    pub criterion_id: String,
    pub raw: f64,
    pub confidence: f64,
    pub justification: String,
}
