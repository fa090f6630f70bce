//! Tipos de error del planificador y de la carga del catálogo.

use std::path::PathBuf;
use thiserror::Error;

/// Motivo por el que un `PreferenceSet` no sirve para generar un plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreferenceIssue {
    #[error("no requirement categories selected")]
    EmptyRequirements,

    #[error("no credit load selected")]
    EmptyCreditLoad,

    #[error("credit load values must be positive (got {0})")]
    NonPositiveCreditLoad(i32),
}

/// Errores del motor de generación de planes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// Preferencias inválidas: se reporta antes de calcular nada.
    #[error("invalid preferences: {0}")]
    InvalidPreferences(#[from] PreferenceIssue),

    /// Registro de curso sin código o con créditos inválidos. Se recupera
    /// localmente descartando el registro.
    #[error("malformed course record '{code}': {reason}")]
    MalformedCourseRecord { code: String, reason: String },
}

/// Errores al localizar o leer un catálogo de cursos.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read catalog spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("unsupported catalog format: {0}")]
    UnsupportedFormat(String),

    #[error("catalog '{0}' not found")]
    NotFound(String),

    #[error("catalog {0} contains no usable course records")]
    Empty(PathBuf),
}
