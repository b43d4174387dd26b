//! Core library for the accelerator platform: convocatoria catalog,
//! postulación intake, and the rubric evaluation workflow.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
