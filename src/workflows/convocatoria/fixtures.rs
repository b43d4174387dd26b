//! Seeded demo data: a published convocatoria plus one strong and one weak
//! startup, used by the CLI demo and the test suite.

use chrono::NaiveDate;

use super::catalog::Convocatoria;
use super::postulaciones::domain::{
    AiScoreInput, Answer, ConvocatoriaId, ManualScoreInput, PostulacionSubmission, StartupProfile,
};

/// Published standard convocatoria with a 2026 window.
pub fn convocatoria_demo() -> Convocatoria {
    let opens_on = NaiveDate::from_ymd_opt(2026, 1, 15).expect("valid date");
    let closes_on = NaiveDate::from_ymd_opt(2026, 12, 15).expect("valid date");
    let mut convocatoria = Convocatoria::standard(
        ConvocatoriaId("conv-2026-01".to_string()),
        "Convocatoria Aceleración 2026",
        opens_on,
        closes_on,
    );
    convocatoria
        .publish()
        .expect("standard rubric always publishes");
    convocatoria
}

/// A date inside the demo convocatoria's window.
pub fn demo_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date")
}

fn answers_with(convocatoria: &Convocatoria, text_for: impl Fn(&str) -> String) -> Vec<Answer> {
    convocatoria
        .criteria()
        .iter()
        .enumerate()
        .map(|(index, criterion)| Answer {
            criterion_id: criterion.id.clone(),
            text: text_for(&criterion.id),
            order: index as u16,
        })
        .collect()
}

/// Strong fixture: an industrial IoT startup with substantive answers.
pub fn sensorgrid() -> PostulacionSubmission {
    let convocatoria = convocatoria_demo();
    PostulacionSubmission {
        startup: StartupProfile {
            nombre: "SensorGrid".to_string(),
            sector: "IoT industrial".to_string(),
            resumen: "Monitorización predictiva de maquinaria con sensores propios".to_string(),
        },
        answers: answers_with(&convocatoria, |criterion_id| {
            format!(
                "Respuesta detallada para {criterion_id}: métricas validadas con 12 \
                 clientes industriales y datos de 18 meses de operación."
            )
        }),
    }
}

/// Weak fixture: every criterion answered, but with thin content. Mirrors
/// the low-performance seed startup used to exercise the rechazado path.
pub fn quickfix_app() -> PostulacionSubmission {
    let convocatoria = convocatoria_demo();
    PostulacionSubmission {
        startup: StartupProfile {
            nombre: "QuickFix App".to_string(),
            sector: "Servicios a domicilio".to_string(),
            resumen: "App genérica de reparaciones a domicilio".to_string(),
        },
        answers: answers_with(&convocatoria, |_| {
            "Aún no lo hemos definido, pero creemos que irá bien.".to_string()
        }),
    }
}

/// Uniform manual scores across the full rubric, for scripted walkthroughs.
pub fn manual_scores_uniform(convocatoria: &Convocatoria, raw: u8) -> Vec<ManualScoreInput> {
    convocatoria
        .criteria()
        .iter()
        .map(|criterion| ManualScoreInput {
            criterion_id: criterion.id.clone(),
            raw,
            justification: format!("Rúbrica aplicada a {}", criterion.id),
        })
        .collect()
}

/// Uniform AI scores across the full rubric.
pub fn ai_scores_uniform(
    convocatoria: &Convocatoria,
    raw: f64,
    confidence: f64,
) -> Vec<AiScoreInput> {
    convocatoria
        .criteria()
        .iter()
        .map(|criterion| AiScoreInput {
            criterion_id: criterion.id.clone(),
            raw,
            confidence,
            justification: format!("Evaluación IA de {}", criterion.id),
        })
        .collect()
}
