// Módulo de alto nivel del generador de planes.
// Submódulos (archivos en la carpeta `src/algorithm`)
pub mod eligibility;
pub mod planner;
pub mod selector;
pub mod validate;

// API pública del motor
pub use planner::{generate_plan, generate_plan_random, generate_plan_seeded};
pub use selector::{ByCode, CandidateOrder, ExplicitOrder, KeepOrder, RandomOrder};
pub use validate::{check_course_record, validate_preferences};

use crate::catalog::CourseCatalog;
use crate::error::PlanError;
use crate::models::{AuditRecord, Plan, PreferenceSet, SelectionStrategy};

/// Punto de entrada usado por el servidor: semilla opcional (reproducible)
/// o barajado aleatorio si no hay semilla.
pub fn plan_for_catalog(
    preferences: &PreferenceSet,
    audit: &AuditRecord,
    catalog: &CourseCatalog,
    seed: Option<u64>,
    strategy: SelectionStrategy,
) -> Result<Plan, PlanError> {
    match seed {
        Some(s) => generate_plan_seeded(preferences, audit, catalog.iter(), s, strategy),
        None => generate_plan(preferences, audit, catalog.iter(), &mut RandomOrder::thread(), strategy),
    }
}
