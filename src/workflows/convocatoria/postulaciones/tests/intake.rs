use chrono::NaiveDate;

use super::common::*;
use crate::workflows::convocatoria::catalog::Convocatoria;
use crate::workflows::convocatoria::postulaciones::domain::{Answer, ConvocatoriaId};
use crate::workflows::convocatoria::postulaciones::intake::{IntakeGuard, IntakeViolation};

fn guard() -> IntakeGuard {
    IntakeGuard::for_convocatoria(convocatoria())
}

#[test]
fn complete_submission_passes() {
    guard()
        .validate_submission(&submission(), today())
        .expect("complete submission is valid");
}

#[test]
fn missing_required_answer_is_rejected() {
    let mut submission = submission();
    submission
        .answers
        .retain(|answer| answer.criterion_id != "equipo-fundadores");

    let error = guard()
        .validate_submission(&submission, today())
        .expect_err("incomplete questionnaire");
    assert!(matches!(
        error,
        IntakeViolation::MissingRequiredAnswer { criterion_id } if criterion_id == "equipo-fundadores"
    ));
}

#[test]
fn empty_answer_text_is_rejected() {
    let mut submission = submission();
    submission.answers[0].text = "   ".to_string();

    let error = guard()
        .validate_submission(&submission, today())
        .expect_err("blank answer");
    assert!(matches!(error, IntakeViolation::EmptyAnswer { .. }));
}

#[test]
fn unknown_criterion_is_rejected() {
    let mut submission = submission();
    submission.answers.push(Answer {
        criterion_id: "finanzas-runway".to_string(),
        text: "18 meses".to_string(),
        order: 99,
    });

    let error = guard()
        .validate_submission(&submission, today())
        .expect_err("criterion outside the rubric");
    assert!(matches!(error, IntakeViolation::UnknownCriterion { .. }));
}

#[test]
fn duplicate_answers_are_rejected() {
    let mut submission = submission();
    let duplicate = submission.answers[0].clone();
    submission.answers.push(duplicate);

    let error = guard()
        .validate_submission(&submission, today())
        .expect_err("duplicate answer");
    assert!(matches!(error, IntakeViolation::DuplicateAnswer { .. }));
}

#[test]
fn submissions_outside_the_window_are_rejected() {
    let late = NaiveDate::from_ymd_opt(2027, 1, 10).expect("valid date");

    let error = guard()
        .validate_submission(&submission(), late)
        .expect_err("window closed");
    assert!(matches!(error, IntakeViolation::OutsideWindow { .. }));
}

#[test]
fn unpublished_convocatorias_accept_nothing() {
    let draft = Convocatoria::standard(
        ConvocatoriaId("conv-borrador".to_string()),
        "Borrador",
        NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date"),
        NaiveDate::from_ymd_opt(2026, 12, 31).expect("valid date"),
    );
    let guard = IntakeGuard::for_convocatoria(draft);

    let error = guard
        .validate_submission(&submission(), today())
        .expect_err("draft convocatoria");
    assert!(matches!(error, IntakeViolation::NotPublished { .. }));
}

#[test]
fn missing_startup_name_is_rejected() {
    let mut submission = submission();
    submission.startup.nombre = "  ".to_string();

    let error = guard()
        .validate_submission(&submission, today())
        .expect_err("anonymous startup");
    assert!(matches!(error, IntakeViolation::MissingStartupName));
}

#[test]
fn draft_answers_may_be_partial() {
    let mut submission = submission();
    submission.answers.truncate(3);

    guard()
        .validate_draft_answers(&submission.answers)
        .expect("partial drafts are fine");
}
