// planner.rs - Generador del plan de semestre
//
// Pipeline:
// PASO 0: validar preferencias (techo de créditos = máximo de creditLoad)
// PASO 1: conjunto de códigos tomados (aprobados ∪ en curso)
// PASO 2: códigos que satisfacen alguna categoría elegida por el estudiante
// PASO 3: filtro de elegibilidad sobre el catálogo -> pool de candidatos
// PASO 4: ordenar el pool (inyectable) y acumular con la estrategia elegida
// PASO 5: armar el Plan con el eco de criterios
//
// Función pura: no lee estado global ni modifica sus entradas.

use tracing::debug;

use crate::algorithm::eligibility::{candidate_pool, requirement_codes, TakenCourses};
use crate::algorithm::selector::{select_courses, total_credits, CandidateOrder, RandomOrder};
use crate::algorithm::validate::validate_preferences;
use crate::error::PlanError;
use crate::models::{
    AuditRecord, CourseRecord, Plan, PlanCriteria, PreferenceSet, SelectionStrategy, MAX_PLAN_COURSES,
};

/// Genera un plan con un orden de candidatos y una estrategia explícitos.
///
/// Mismas entradas + mismo `order` ⇒ mismo plan.
pub fn generate_plan<'a, I, O>(
    preferences: &PreferenceSet,
    audit: &AuditRecord,
    catalog: I,
    order: &mut O,
    strategy: SelectionStrategy,
) -> Result<Plan, PlanError>
where
    I: IntoIterator<Item = &'a CourseRecord>,
    O: CandidateOrder + ?Sized,
{
    // PASO 0
    let ceiling = validate_preferences(preferences)?;

    // PASO 1 y 2
    let taken = TakenCourses::from_audit(audit);
    let eligible = requirement_codes(audit, &preferences.requirements);

    // PASO 3
    let mut pool = candidate_pool(catalog, &eligible, &taken);
    debug!(
        taken = taken.len(),
        eligible = eligible.len(),
        candidates = pool.len(),
        "candidate pool built"
    );

    // PASO 4
    order.arrange(&mut pool);
    let chosen = select_courses(&pool, f64::from(ceiling), MAX_PLAN_COURSES, strategy);
    let total_credits = total_credits(&chosen);

    debug!(
        courses = chosen.len(),
        total_credits,
        ceiling,
        strategy = %strategy,
        "plan selected"
    );

    // PASO 5
    Ok(Plan {
        plan: chosen,
        total_credits,
        criteria: PlanCriteria {
            selected_requirements: preferences.requirements.clone(),
            credit_load: ceiling,
            excluded_courses: taken.codes(),
            difficulty: preferences.difficulty,
            strategy,
        },
    })
}

/// Variante de producción: baraja con el RNG del hilo, estrategia first-fit.
pub fn generate_plan_random<'a, I>(
    preferences: &PreferenceSet,
    audit: &AuditRecord,
    catalog: I,
) -> Result<Plan, PlanError>
where
    I: IntoIterator<Item = &'a CourseRecord>,
{
    generate_plan(preferences, audit, catalog, &mut RandomOrder::thread(), SelectionStrategy::FirstFit)
}

/// Barajado reproducible a partir de una semilla.
pub fn generate_plan_seeded<'a, I>(
    preferences: &PreferenceSet,
    audit: &AuditRecord,
    catalog: I,
    seed: u64,
    strategy: SelectionStrategy,
) -> Result<Plan, PlanError>
where
    I: IntoIterator<Item = &'a CourseRecord>,
{
    generate_plan(preferences, audit, catalog, &mut RandomOrder::seeded(seed), strategy)
}
