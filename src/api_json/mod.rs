use serde::{Deserialize, Serialize};

use crate::catalog::{normalize_code, CourseCatalog, RawCourseRecord};
use crate::models::{AuditRecord, PreferenceSet, SelectionStrategy};

/// Cuerpo de `POST /plan`
///
/// # Estructura del JSON esperado:
/// ```json
/// {
///   "preferences": {
///     "requirements": ["Major Core", "General Education"],
///     "creditLoad": [12, 15],
///     "difficulty": "Moderate"
///   },
///   "audit": {
///     "completedCourses": [{ "code": "CS 111", "semester": "FA24", "grade": "A" }],
///     "inProgressCourses": [{ "code": "CS 141", "semester": "SP25" }],
///     "remainingRequirements": [
///       { "category": "Major Core", "coursesNeeded": 2, "courses": [{ "code": "CS 151" }, { "code": "CS 211" }] }
///     ]
///   },
///   "catalog": null,
///   "seed": 42,
///   "strategy": "first-fit"
/// }
/// ```
///
/// # Campos:
/// - `preferences`: preferencias del formulario (requerido)
/// - `audit`: auditoría ya parseada (requerido)
/// - `catalog`: catálogo propio (opcional); si falta se usa el del servidor
/// - `seed`: semilla para un plan reproducible (opcional)
/// - `strategy`: `first-fit` o `max-credits` (opcional)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub preferences: PreferenceSet,
    #[serde(default)]
    pub audit: AuditRecord,
    #[serde(default)]
    pub catalog: Option<Vec<RawCourseRecord>>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub strategy: Option<SelectionStrategy>,
}

pub fn parse_plan_request(json_str: &str) -> Result<PlanRequest, serde_json::Error> {
    serde_json::from_str::<PlanRequest>(json_str)
}

/// Normaliza una sola vez todos los códigos y etiquetas que llegan del
/// frontend/parser para que el motor compare códigos exactos.
pub fn normalize_request(mut req: PlanRequest) -> PlanRequest {
    let audit = &mut req.audit;
    for c in audit.completed_courses.iter_mut() {
        c.code = normalize_code(&c.code);
    }
    for c in audit.in_progress_courses.iter_mut() {
        c.code = normalize_code(&c.code);
    }
    for group in audit.remaining_requirements.iter_mut() {
        group.category = group.category.trim().to_string();
        for c in group.courses.iter_mut() {
            c.code = normalize_code(&c.code);
        }
    }

    req.preferences.requirements = req
        .preferences
        .requirements
        .iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect();

    req
}

/// Completa los códigos vacíos de la auditoría a partir del título usando el
/// catálogo indicado.
pub fn resolve_audit_codes(audit: AuditRecord, catalog: &CourseCatalog) -> AuditRecord {
    resolve_audit_codes_with_resolver(audit, |title| catalog.find_by_title(title).map(|r| r.code.clone()))
}

/// Versión parametrizable para pruebas: recibe un `resolver` que intenta mapear
/// un título a un código. Las entradas que no se resuelven quedan con código
/// vacío y el motor las ignora.
pub fn resolve_audit_codes_with_resolver<F>(mut audit: AuditRecord, resolver: F) -> AuditRecord
where
    F: Fn(&str) -> Option<String>,
{
    let resolve_one = |code: &mut String, title: &str| {
        if code.trim().is_empty() && !title.trim().is_empty() {
            if let Some(found) = resolver(title) {
                *code = found;
            }
        }
    };

    for c in audit.completed_courses.iter_mut() {
        resolve_one(&mut c.code, &c.title);
    }
    for c in audit.in_progress_courses.iter_mut() {
        resolve_one(&mut c.code, &c.title);
    }
    for group in audit.remaining_requirements.iter_mut() {
        for c in group.courses.iter_mut() {
            resolve_one(&mut c.code, &c.title);
        }
    }

    audit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;

    #[test]
    fn test_parse_full_request() {
        let json_data = r#"
        {
            "preferences": { "requirements": ["Major Core"], "creditLoad": [15], "difficulty": "Challenging" },
            "audit": {
                "completedCourses": [{ "code": "cs101", "semester": "FA24", "grade": "A" }],
                "remainingRequirements": [{ "category": " Major Core ", "coursesNeeded": 1, "courses": [{ "code": "CS201" }] }]
            },
            "seed": 7,
            "strategy": "max-credits"
        }
        "#;

        let req = normalize_request(parse_plan_request(json_data).expect("Debe parsear la solicitud"));
        assert_eq!(req.preferences.difficulty, Difficulty::Challenging);
        assert_eq!(req.audit.completed_courses[0].code, "CS 101");
        assert_eq!(req.audit.remaining_requirements[0].category, "Major Core");
        assert_eq!(req.audit.remaining_requirements[0].courses[0].code, "CS 201");
        assert_eq!(req.seed, Some(7));
        assert_eq!(req.strategy, Some(SelectionStrategy::MaxCredits));
        assert!(req.catalog.is_none());
    }

    #[test]
    fn test_minimal_request_uses_defaults() {
        let req = parse_plan_request(r#"{ "preferences": { "requirements": ["Major Core"], "creditLoad": [12] } }"#)
            .expect("Debe parsear sin auditoría");
        assert_eq!(req.preferences.difficulty, Difficulty::Moderate);
        assert!(req.audit.completed_courses.is_empty());
        assert!(req.strategy.is_none());
    }

    #[test]
    fn test_resolve_audit_codes_with_mock() {
        let audit: AuditRecord = serde_json::from_str(
            r#"{
                "completedCourses": [{ "title": "Program Design I" }, { "code": "MATH 180", "title": "Calculus I" }],
                "inProgressCourses": [{ "title": "Unknown Seminar" }]
            }"#,
        )
        .unwrap();

        let resolver = |title: &str| -> Option<String> {
            if title.to_lowercase().contains("program design") {
                return Some("CS 111".to_string());
            }
            None
        };

        let resolved = resolve_audit_codes_with_resolver(audit, resolver);
        assert_eq!(resolved.completed_courses[0].code, "CS 111");
        assert_eq!(resolved.completed_courses[1].code, "MATH 180");
        assert_eq!(resolved.in_progress_courses[0].code, "");
    }
}
