use std::collections::BTreeMap;
use std::string::FromUtf8Error;

use serde::Serialize;

use super::catalog::Convocatoria;
use super::postulaciones::domain::{Category, PostulacionId, PostulacionStatus};
use super::postulaciones::repository::PostulacionRecord;

/// Admin-facing summary of a convocatoria's postulaciones: lifecycle counts,
/// category averages across completed evaluations, and a score ranking.
#[derive(Debug, Clone, Serialize)]
pub struct ConvocatoriaReport {
    pub convocatoria_id: String,
    pub nombre: String,
    pub status_counts: Vec<StatusCountEntry>,
    pub category_averages: BTreeMap<Category, f64>,
    pub ranking: Vec<RankingEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusCountEntry {
    pub status: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingEntry {
    pub postulacion_id: PostulacionId,
    pub startup: String,
    pub total: f64,
    pub recommendation: &'static str,
}

const STATUS_ORDER: [PostulacionStatus; 6] = [
    PostulacionStatus::Borrador,
    PostulacionStatus::Enviada,
    PostulacionStatus::EnRevision,
    PostulacionStatus::Evaluada,
    PostulacionStatus::Aprobada,
    PostulacionStatus::Rechazada,
];

impl ConvocatoriaReport {
    pub fn build(convocatoria: &Convocatoria, records: &[PostulacionRecord]) -> Self {
        let status_counts = STATUS_ORDER
            .into_iter()
            .map(|status| StatusCountEntry {
                status: status.label(),
                count: records.iter().filter(|record| record.status == status).count(),
            })
            .collect();

        let mut category_sums: BTreeMap<Category, (f64, usize)> = BTreeMap::new();
        let mut ranking = Vec::new();

        for record in records {
            let Some(report) = record
                .evaluation
                .as_ref()
                .and_then(|evaluation| evaluation.report.as_ref())
            else {
                continue;
            };

            for (category, subtotal) in &report.per_category {
                let entry = category_sums.entry(*category).or_insert((0.0, 0));
                entry.0 += subtotal;
                entry.1 += 1;
            }

            ranking.push(RankingEntry {
                postulacion_id: record.postulacion.id.clone(),
                startup: record.postulacion.startup.nombre.clone(),
                total: report.total,
                recommendation: report.recommendation.label(),
            });
        }

        ranking.sort_by(|a, b| {
            b.total
                .partial_cmp(&a.total)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.postulacion_id.cmp(&b.postulacion_id))
        });

        let category_averages = category_sums
            .into_iter()
            .map(|(category, (sum, count))| (category, sum / count as f64))
            .collect();

        Self {
            convocatoria_id: convocatoria.id().0.clone(),
            nombre: convocatoria.nombre().to_string(),
            status_counts,
            category_averages,
            ranking,
        }
    }

    /// Ranking as CSV for admin download.
    pub fn to_csv(&self) -> Result<String, ReportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["postulacion_id", "startup", "total", "recomendacion"])?;
        for entry in &self.ranking {
            let total = format!("{:.1}", entry.total);
            writer.write_record([
                entry.postulacion_id.0.as_str(),
                entry.startup.as_str(),
                total.as_str(),
                entry.recommendation,
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|error| ReportError::Flush(error.to_string()))?;
        Ok(String::from_utf8(bytes)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("csv serialization failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv buffer flush failed: {0}")]
    Flush(String),
    #[error("csv output is not valid UTF-8: {0}")]
    Encoding(#[from] FromUtf8Error),
}
