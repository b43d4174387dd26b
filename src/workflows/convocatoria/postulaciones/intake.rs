use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::super::catalog::{Convocatoria, ConvocatoriaStatus};
use super::domain::{Answer, PostulacionSubmission};

/// Validation errors raised at the intake boundary. Fail closed: a rejected
/// submission is never persisted.
#[derive(Debug, thiserror::Error)]
pub enum IntakeViolation {
    #[error("convocatoria '{convocatoria_id}' is {status}, not publicada")]
    NotPublished {
        convocatoria_id: String,
        status: &'static str,
    },
    #[error("convocatoria '{convocatoria_id}' is not open on {date}")]
    OutsideWindow {
        convocatoria_id: String,
        date: NaiveDate,
    },
    #[error("answer references unknown criterion '{criterion_id}'")]
    UnknownCriterion { criterion_id: String },
    #[error("criterion '{criterion_id}' answered more than once")]
    DuplicateAnswer { criterion_id: String },
    #[error("required criterion '{criterion_id}' has no answer")]
    MissingRequiredAnswer { criterion_id: String },
    #[error("answer for '{criterion_id}' is empty")]
    EmptyAnswer { criterion_id: String },
    #[error("startup name is empty")]
    MissingStartupName,
}

/// Guard validating postulación submissions against one convocatoria's
/// published rubric.
#[derive(Debug, Clone)]
pub struct IntakeGuard {
    convocatoria: Convocatoria,
}

impl IntakeGuard {
    pub fn for_convocatoria(convocatoria: Convocatoria) -> Self {
        Self { convocatoria }
    }

    pub fn convocatoria(&self) -> &Convocatoria {
        &self.convocatoria
    }

    /// Full submission check: open window, known criteria, one non-empty
    /// answer per required criterion.
    pub fn validate_submission(
        &self,
        submission: &PostulacionSubmission,
        today: NaiveDate,
    ) -> Result<(), IntakeViolation> {
        let convocatoria_id = self.convocatoria.id().0.clone();

        if self.convocatoria.status() != ConvocatoriaStatus::Publicada {
            return Err(IntakeViolation::NotPublished {
                convocatoria_id,
                status: self.convocatoria.status().label(),
            });
        }
        if !self.convocatoria.is_open(today) {
            return Err(IntakeViolation::OutsideWindow {
                convocatoria_id,
                date: today,
            });
        }
        if submission.startup.nombre.trim().is_empty() {
            return Err(IntakeViolation::MissingStartupName);
        }

        self.validate_answers(&submission.answers)
    }

    /// Complete answer-set check: every required criterion must be covered.
    pub fn validate_answers(&self, answers: &[Answer]) -> Result<(), IntakeViolation> {
        let answered = self.validate_draft_answers(answers)?;

        for criterion in self.convocatoria.criteria() {
            if criterion.required && !answered.contains(criterion.id.as_str()) {
                return Err(IntakeViolation::MissingRequiredAnswer {
                    criterion_id: criterion.id.clone(),
                });
            }
        }

        Ok(())
    }

    /// Draft check: answers must reference known criteria and carry text, but
    /// the set may still be partial.
    pub fn validate_draft_answers<'a>(
        &self,
        answers: &'a [Answer],
    ) -> Result<BTreeSet<&'a str>, IntakeViolation> {
        let mut answered: BTreeSet<&str> = BTreeSet::new();

        for answer in answers {
            if self.convocatoria.criterion(&answer.criterion_id).is_none() {
                return Err(IntakeViolation::UnknownCriterion {
                    criterion_id: answer.criterion_id.clone(),
                });
            }
            if !answered.insert(answer.criterion_id.as_str()) {
                return Err(IntakeViolation::DuplicateAnswer {
                    criterion_id: answer.criterion_id.clone(),
                });
            }
            if answer.text.trim().is_empty() {
                return Err(IntakeViolation::EmptyAnswer {
                    criterion_id: answer.criterion_id.clone(),
                });
            }
        }

        Ok(answered)
    }
}
