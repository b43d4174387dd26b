pub mod convocatoria;
