// Estructuras de datos principales del planificador de semestre.
//
// Todas usan camelCase en el JSON porque así las emiten el parser de
// auditorías y el formulario del frontend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Máximo de cursos que puede contener un plan generado.
pub const MAX_PLAN_COURSES: usize = 5;

/// Curso del catálogo. Dato de referencia inmutable: el motor nunca lo modifica.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    pub code: String,
    #[serde(default)]
    pub title: String,
    pub credits: f64,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub prereqs: Vec<String>,
}

impl CourseRecord {
    pub fn new(code: &str, title: &str, credits: f64, prereqs: &[&str]) -> Self {
        CourseRecord {
            code: code.to_string(),
            title: title.to_string(),
            credits,
            subject: crate::catalog::subject_from_code(code),
            prereqs: prereqs.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Curso aprobado en la auditoría.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompletedCourse {
    pub code: String,
    pub title: String,
    pub credits: Option<f64>,
    pub semester: String,
    pub grade: String,
}

/// Curso en curso: todavía sin nota.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InProgressCourse {
    pub code: String,
    pub title: String,
    pub credits: Option<f64>,
    pub semester: String,
}

/// Opción dentro de un grupo de requisitos pendiente.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseRef {
    pub code: String,
    pub title: String,
}

/// Grupo de requisitos pendiente (p. ej. "Major Core") y los cursos que lo satisfacen.
/// Distintos grupos pueden compartir códigos.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequirementGroup {
    pub category: String,
    pub courses_needed: u32,
    pub courses: Vec<CourseRef>,
}

/// Estado de la auditoría de grado ya parseada.
///
/// Un código aprobado o en curso puede seguir apareciendo como opción en
/// `remaining_requirements`; es el motor quien lo excluye al seleccionar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuditRecord {
    pub completed_courses: Vec<CompletedCourse>,
    pub in_progress_courses: Vec<InProgressCourse>,
    pub remaining_requirements: Vec<RequirementGroup>,
}

/// Dificultad elegida por el estudiante. Sólo se muestra; la política actual
/// no la usa para filtrar ni ordenar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "Very Easy")]
    VeryEasy,
    Easy,
    #[default]
    Moderate,
    Challenging,
    Intensive,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::VeryEasy,
        Difficulty::Easy,
        Difficulty::Moderate,
        Difficulty::Challenging,
        Difficulty::Intensive,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::VeryEasy => "Very Easy",
            Difficulty::Easy => "Easy",
            Difficulty::Moderate => "Moderate",
            Difficulty::Challenging => "Challenging",
            Difficulty::Intensive => "Intensive",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Preferencias del formulario "Sculpt your Semester".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceSet {
    #[serde(default)]
    pub requirements: Vec<String>,
    /// Cargas aceptables; el motor usa el máximo como techo de créditos.
    #[serde(default)]
    pub credit_load: Vec<i32>,
    #[serde(default)]
    pub difficulty: Difficulty,
}

/// Cómo se acumulan los candidatos una vez ordenados.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionStrategy {
    /// Pasada greedy de izquierda a derecha (comportamiento de referencia).
    #[default]
    FirstFit,
    /// Maximiza los créditos usados bajo el techo.
    MaxCredits,
}

impl SelectionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionStrategy::FirstFit => "first-fit",
            SelectionStrategy::MaxCredits => "max-credits",
        }
    }
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "first-fit" | "firstfit" | "greedy" => Ok(SelectionStrategy::FirstFit),
            "max-credits" | "maxcredits" => Ok(SelectionStrategy::MaxCredits),
            other => Err(format!("unknown selection strategy '{}'", other)),
        }
    }
}

/// Eco de los criterios usados para generar el plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanCriteria {
    pub selected_requirements: Vec<String>,
    /// Techo de créditos aplicado (máximo de `credit_load`).
    pub credit_load: u32,
    /// Códigos aprobados o en curso excluidos, ordenados.
    pub excluded_courses: Vec<String>,
    pub difficulty: Difficulty,
    pub strategy: SelectionStrategy,
}

/// Plan sugerido. Se crea en cada invocación y no se muta después.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub plan: Vec<CourseRecord>,
    pub total_credits: f64,
    pub criteria: PlanCriteria,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.plan.is_empty()
    }

    pub fn codes(&self) -> Vec<&str> {
        self.plan.iter().map(|c| c.code.as_str()).collect()
    }
}
