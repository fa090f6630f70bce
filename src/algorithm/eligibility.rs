//! Filtro de elegibilidad del planificador.
//!
//! Un curso del catálogo es candidato si y sólo si:
//! - aparece en algún grupo de requisitos cuya categoría eligió el estudiante,
//! - no está aprobado ni en curso,
//! - todos sus prerequisitos están aprobados (los cursos en curso no cuentan).
use std::collections::{BTreeSet, HashSet};

use tracing::warn;

use crate::algorithm::validate::check_course_record;
use crate::models::{AuditRecord, CourseRecord};

/// Códigos ya tomados por el estudiante.
#[derive(Debug, Clone, Default)]
pub struct TakenCourses {
    completed: HashSet<String>,
    in_progress: HashSet<String>,
}

impl TakenCourses {
    pub fn from_audit(audit: &AuditRecord) -> Self {
        let completed = audit
            .completed_courses
            .iter()
            .map(|c| c.code.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        let in_progress = audit
            .in_progress_courses
            .iter()
            .map(|c| c.code.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        TakenCourses { completed, in_progress }
    }

    pub fn is_completed(&self, code: &str) -> bool {
        self.completed.contains(code)
    }

    /// Aprobado o en curso.
    pub fn is_taken(&self, code: &str) -> bool {
        self.completed.contains(code) || self.in_progress.contains(code)
    }

    /// Prerequisitos vacíos se cumplen trivialmente.
    pub fn prereqs_met(&self, prereqs: &[String]) -> bool {
        prereqs.iter().all(|p| self.is_completed(p.trim()))
    }

    /// Unión ordenada de aprobados y en curso (para el eco de criterios).
    pub fn codes(&self) -> Vec<String> {
        let all: BTreeSet<&String> = self.completed.iter().chain(self.in_progress.iter()).collect();
        all.into_iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.completed.union(&self.in_progress).count()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty() && self.in_progress.is_empty()
    }
}

/// Une los códigos de todos los grupos cuya categoría está en `selected`.
/// Categorías sin grupo en la auditoría no aportan nada.
pub fn requirement_codes(audit: &AuditRecord, selected: &[String]) -> HashSet<String> {
    let selected: HashSet<&str> = selected.iter().map(|s| s.trim()).collect();
    let mut codes = HashSet::new();

    for group in audit
        .remaining_requirements
        .iter()
        .filter(|g| selected.contains(g.category.trim()))
    {
        for course in group.courses.iter() {
            let code = course.code.trim();
            if code.is_empty() {
                warn!(
                    category = %group.category,
                    title = %course.title,
                    "requirement option without course code, skipping"
                );
                continue;
            }
            codes.insert(code.to_string());
        }
    }

    codes
}

/// Recorre el catálogo y devuelve los candidatos en orden de catálogo.
/// Registros mal formados se descartan y los códigos repetidos conservan la
/// primera aparición.
pub fn candidate_pool<'a, I>(catalog: I, eligible: &HashSet<String>, taken: &TakenCourses) -> Vec<CourseRecord>
where
    I: IntoIterator<Item = &'a CourseRecord>,
{
    let mut seen: HashSet<&str> = HashSet::new();
    let mut pool = Vec::new();

    for course in catalog {
        if let Err(e) = check_course_record(course) {
            warn!("{}", e);
            continue;
        }
        let code = course.code.trim();
        if !seen.insert(code) {
            warn!(code, "duplicate catalog entry, keeping first occurrence");
            continue;
        }
        if eligible.contains(code) && !taken.is_taken(code) && taken.prereqs_met(&course.prereqs) {
            pool.push(course.clone());
        }
    }

    pool
}
