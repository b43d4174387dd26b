use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::postulaciones::domain::{Category, ConvocatoriaId, Criterion};

/// Publication state of a convocatoria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConvocatoriaStatus {
    Borrador,
    Publicada,
    Cerrada,
}

impl ConvocatoriaStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ConvocatoriaStatus::Borrador => "borrador",
            ConvocatoriaStatus::Publicada => "publicada",
            ConvocatoriaStatus::Cerrada => "cerrada",
        }
    }
}

/// A call for applications with its rubric. The criteria list is only
/// mutable while the convocatoria is a draft; publishing freezes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Convocatoria {
    id: ConvocatoriaId,
    nombre: String,
    opens_on: NaiveDate,
    closes_on: NaiveDate,
    status: ConvocatoriaStatus,
    criteria: Vec<Criterion>,
}

impl Convocatoria {
    pub fn draft(
        id: ConvocatoriaId,
        nombre: impl Into<String>,
        opens_on: NaiveDate,
        closes_on: NaiveDate,
    ) -> Self {
        Self {
            id,
            nombre: nombre.into(),
            opens_on,
            closes_on,
            status: ConvocatoriaStatus::Borrador,
            criteria: Vec::new(),
        }
    }

    /// Draft carrying the standard 16-criterion rubric.
    pub fn standard(
        id: ConvocatoriaId,
        nombre: impl Into<String>,
        opens_on: NaiveDate,
        closes_on: NaiveDate,
    ) -> Self {
        let mut convocatoria = Self::draft(id, nombre, opens_on, closes_on);
        convocatoria.criteria = CriteriaCatalog::standard();
        convocatoria
    }

    pub fn id(&self) -> &ConvocatoriaId {
        &self.id
    }

    pub fn nombre(&self) -> &str {
        &self.nombre
    }

    pub fn status(&self) -> ConvocatoriaStatus {
        self.status
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn criterion(&self, criterion_id: &str) -> Option<&Criterion> {
        self.criteria
            .iter()
            .find(|criterion| criterion.id == criterion_id)
    }

    pub fn add_criterion(&mut self, criterion: Criterion) -> Result<(), CatalogError> {
        if self.status != ConvocatoriaStatus::Borrador {
            return Err(CatalogError::RubricFrozen {
                status: self.status.label(),
            });
        }
        if self.criterion(&criterion.id).is_some() {
            return Err(CatalogError::DuplicateCriterion {
                criterion_id: criterion.id,
            });
        }
        if criterion.weight <= 0.0 {
            return Err(CatalogError::InvalidWeight {
                criterion_id: criterion.id,
                weight: criterion.weight,
            });
        }
        self.criteria.push(criterion);
        Ok(())
    }

    /// Freeze the rubric and open the convocatoria for postulaciones. Every
    /// category must be represented so totals never lose a dimension by
    /// construction.
    pub fn publish(&mut self) -> Result<(), CatalogError> {
        if self.status != ConvocatoriaStatus::Borrador {
            return Err(CatalogError::AlreadyPublished {
                status: self.status.label(),
            });
        }
        for category in Category::ALL {
            if !self
                .criteria
                .iter()
                .any(|criterion| criterion.category == category)
            {
                return Err(CatalogError::CategoryNotCovered { category });
            }
        }
        self.status = ConvocatoriaStatus::Publicada;
        Ok(())
    }

    pub fn close(&mut self) {
        self.status = ConvocatoriaStatus::Cerrada;
    }

    /// Whether postulaciones are accepted on `today`.
    pub fn is_open(&self, today: NaiveDate) -> bool {
        self.status == ConvocatoriaStatus::Publicada
            && today >= self.opens_on
            && today <= self.closes_on
    }

    pub fn closes_on(&self) -> NaiveDate {
        self.closes_on
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("rubric is frozen once the convocatoria is {status}")]
    RubricFrozen { status: &'static str },
    #[error("criterion '{criterion_id}' already exists")]
    DuplicateCriterion { criterion_id: String },
    #[error("criterion '{criterion_id}' has non-positive weight {weight}")]
    InvalidWeight { criterion_id: String, weight: f64 },
    #[error("convocatoria is already {status}")]
    AlreadyPublished { status: &'static str },
    #[error("no criterion covers category '{}'", category.label())]
    CategoryNotCovered { category: Category },
}

/// Seeded rubric shared by every convocatoria of the standard program.
pub struct CriteriaCatalog;

impl CriteriaCatalog {
    /// The fixed set: 16 criteria, 4 per category, uniform weight, all
    /// required.
    pub fn standard() -> Vec<Criterion> {
        let entries: [(&str, Category, &str, &str); 16] = [
            (
                "complejidad-problema",
                Category::Complejidad,
                "¿Qué problema resuelve la startup y por qué es difícil de resolver?",
                "1: problema trivial o difuso · 4: problema profundo, bien delimitado",
            ),
            (
                "complejidad-solucion",
                Category::Complejidad,
                "¿Qué hace a la solución técnicamente diferenciada?",
                "1: sin diferenciación · 4: ventaja técnica demostrable",
            ),
            (
                "complejidad-tecnologia",
                Category::Complejidad,
                "¿Qué tecnología propia ha desarrollado el equipo?",
                "1: integración de terceros · 4: desarrollo propio en producción",
            ),
            (
                "complejidad-barreras",
                Category::Complejidad,
                "¿Qué barreras de entrada protegen la solución frente a imitadores?",
                "1: replicable en semanas · 4: barreras defendibles",
            ),
            (
                "mercado-tamano",
                Category::Mercado,
                "¿Cuál es el tamaño del mercado objetivo (TAM/SAM/SOM)?",
                "1: sin dimensionar · 4: dimensionado con fuentes",
            ),
            (
                "mercado-clientes",
                Category::Mercado,
                "¿Quiénes son los clientes y cómo validaron la necesidad?",
                "1: hipótesis sin contrastar · 4: validación con clientes reales",
            ),
            (
                "mercado-competencia",
                Category::Mercado,
                "¿Quiénes son los competidores directos y cómo se diferencian?",
                "1: desconoce competidores · 4: mapa competitivo claro",
            ),
            (
                "mercado-traccion",
                Category::Mercado,
                "¿Qué tracción comercial tienen hasta la fecha?",
                "1: sin usuarios · 4: ingresos recurrentes en crecimiento",
            ),
            (
                "escalabilidad-modelo",
                Category::Escalabilidad,
                "¿Cómo genera ingresos el modelo de negocio y cómo escala?",
                "1: modelo artesanal · 4: escala sin coste marginal relevante",
            ),
            (
                "escalabilidad-unit-economics",
                Category::Escalabilidad,
                "¿Cuáles son los unit economics actuales y proyectados?",
                "1: sin métricas · 4: CAC/LTV medidos y sanos",
            ),
            (
                "escalabilidad-expansion",
                Category::Escalabilidad,
                "¿Cuál es el plan de expansión a nuevos mercados o segmentos?",
                "1: sin plan · 4: plan secuenciado con hitos",
            ),
            (
                "escalabilidad-operaciones",
                Category::Escalabilidad,
                "¿Qué procesos operativos limitan o habilitan el crecimiento?",
                "1: dependencia total de fundadores · 4: operación sistematizada",
            ),
            (
                "equipo-fundadores",
                Category::Equipo,
                "¿Quiénes son los fundadores y qué experiencia relevante aportan?",
                "1: sin experiencia en el sector · 4: trayectoria directamente aplicable",
            ),
            (
                "equipo-dedicacion",
                Category::Equipo,
                "¿Qué dedicación tiene el equipo al proyecto?",
                "1: tiempo parcial disperso · 4: dedicación completa",
            ),
            (
                "equipo-capacidades",
                Category::Equipo,
                "¿Qué capacidades clave cubre el equipo y cuáles faltan?",
                "1: huecos críticos sin plan · 4: equipo completo o plan de cobertura",
            ),
            (
                "equipo-historia",
                Category::Equipo,
                "¿Han trabajado juntos antes y cómo resuelven conflictos?",
                "1: equipo recién formado · 4: historial conjunto probado",
            ),
        ];

        entries
            .into_iter()
            .map(|(id, category, prompt, rubric)| Criterion {
                id: id.to_string(),
                category,
                prompt: prompt.to_string(),
                rubric: rubric.to_string(),
                weight: 1.0,
                required: true,
            })
            .collect()
    }
}
