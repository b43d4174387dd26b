//! Convocatoria management: the published rubric, postulación intake, the
//! evaluation workflow, and reporting over a convocatoria's record set.

pub mod catalog;
pub mod fixtures;
pub mod postulaciones;
pub mod report;

pub use catalog::{CatalogError, Convocatoria, ConvocatoriaStatus, CriteriaCatalog};
pub use report::{ConvocatoriaReport, RankingEntry, ReportError, StatusCountEntry};
