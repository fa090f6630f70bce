//! Validación de entradas del planificador.
//!
//! Las preferencias inválidas detienen el cálculo; un registro de curso mal
//! formado sólo se descarta.
use crate::error::{PlanError, PreferenceIssue};
use crate::models::{CourseRecord, PreferenceSet};

/// Verifica las preferencias y devuelve el techo de créditos (máximo de `credit_load`).
pub fn validate_preferences(prefs: &PreferenceSet) -> Result<u32, PlanError> {
    if prefs.requirements.iter().all(|r| r.trim().is_empty()) {
        return Err(PreferenceIssue::EmptyRequirements.into());
    }
    if prefs.credit_load.is_empty() {
        return Err(PreferenceIssue::EmptyCreditLoad.into());
    }
    if let Some(bad) = prefs.credit_load.iter().find(|c| **c <= 0) {
        return Err(PreferenceIssue::NonPositiveCreditLoad(*bad).into());
    }

    let ceiling = prefs.credit_load.iter().copied().max().unwrap_or_default();
    Ok(ceiling as u32)
}

/// Un registro es utilizable si tiene código y créditos finitos no negativos.
pub fn check_course_record(course: &CourseRecord) -> Result<(), PlanError> {
    if course.code.trim().is_empty() {
        return Err(PlanError::MalformedCourseRecord {
            code: course.title.clone(),
            reason: "missing course code".to_string(),
        });
    }
    if !course.credits.is_finite() || course.credits < 0.0 {
        return Err(PlanError::MalformedCourseRecord {
            code: course.code.clone(),
            reason: format!("invalid credit value {}", course.credits),
        });
    }
    Ok(())
}
