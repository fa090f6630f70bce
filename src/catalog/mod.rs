//! Módulo `catalog`: catálogo de cursos ofrecidos.
//!
//! Submódulos:
//! - `io`: normalización de códigos/títulos y lectura de JSON o planillas
//! - `raw`: registros sin validar y su conversión a `CourseRecord`
//! - `cache`: caché en memoria de catálogos ya leídos

mod io;
mod raw;
pub mod cache;

pub use cache::{get_catalog_cached, get_catalog_cache_stats};
pub use io::{normalize_code, normalize_title, parse_credits, subject_from_code};
pub use raw::{CreditsValue, PrereqsValue, RawCourseRecord};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use strsim::jaro_winkler;
use tracing::{info, warn};

use crate::error::CatalogError;
use crate::models::CourseRecord;

/// Similitud mínima (Jaro-Winkler) para aceptar un título aproximado.
pub const TITLE_MATCH_THRESHOLD: f64 = 0.92;

/// Colección de sólo lectura de `CourseRecord`, indexada por código.
#[derive(Debug, Clone, Default)]
pub struct CourseCatalog {
    records: Vec<CourseRecord>,
    by_code: HashMap<String, usize>,
}

impl CourseCatalog {
    /// Los códigos repetidos conservan la primera aparición en el índice.
    pub fn from_records(records: Vec<CourseRecord>) -> Self {
        let mut by_code = HashMap::new();
        for (i, r) in records.iter().enumerate() {
            by_code.entry(r.code.clone()).or_insert(i);
        }
        CourseCatalog { records, by_code }
    }

    /// Convierte registros crudos descartando los mal formados.
    /// Devuelve el catálogo y la cantidad de registros descartados.
    pub fn from_raw(raw: Vec<RawCourseRecord>) -> (Self, usize) {
        let mut records = Vec::with_capacity(raw.len());
        let mut skipped = 0usize;
        for r in raw {
            match r.into_record() {
                Ok(rec) => records.push(rec),
                Err(e) => {
                    warn!("{}", e);
                    skipped += 1;
                }
            }
        }
        (CourseCatalog::from_records(records), skipped)
    }

    /// Lee y valida el catálogo desde disco (JSON o planilla).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = io::read_raw_catalog(path)?;
        let total = raw.len();
        let (catalog, skipped) = CourseCatalog::from_raw(raw);
        if catalog.is_empty() {
            return Err(CatalogError::Empty(path.to_path_buf()));
        }
        info!(path = %path.display(), courses = catalog.len(), skipped, total, "📚 catalog loaded");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CourseRecord> {
        self.records.iter()
    }

    /// Búsqueda por código (se normaliza antes de buscar).
    pub fn get(&self, code: &str) -> Option<&CourseRecord> {
        self.by_code.get(&normalize_code(code)).map(|&i| &self.records[i])
    }

    /// Cursos de una materia, sin distinguir mayúsculas.
    pub fn by_subject(&self, subject: &str) -> Vec<&CourseRecord> {
        let wanted = subject.trim().to_uppercase();
        self.records.iter().filter(|r| r.subject.to_uppercase() == wanted).collect()
    }

    /// Busca un curso por título: primero coincidencia exacta normalizada,
    /// luego la más parecida por Jaro-Winkler sobre el umbral.
    pub fn find_by_title(&self, title: &str) -> Option<&CourseRecord> {
        let wanted = normalize_title(title);
        if wanted.is_empty() {
            return None;
        }
        if let Some(exact) = self.records.iter().find(|r| normalize_title(&r.title) == wanted) {
            return Some(exact);
        }

        let mut best: Option<(&CourseRecord, f64)> = None;
        for r in self.records.iter() {
            let similarity = jaro_winkler(&wanted, &normalize_title(&r.title));
            if similarity < TITLE_MATCH_THRESHOLD {
                continue;
            }
            match best {
                Some((_, prev)) if prev >= similarity => {}
                _ => best = Some((r, similarity)),
            }
        }
        best.map(|(r, _)| r)
    }
}

impl<'a> IntoIterator for &'a CourseCatalog {
    type Item = &'a CourseRecord;
    type IntoIter = std::slice::Iter<'a, CourseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Resuelve la ruta del catálogo: una ruta existente gana; si no, se busca
/// el nombre en `data_dir`, `data/` y `datafiles/`.
pub fn resolve_catalog_path(name: &str, data_dir: Option<&Path>) -> Result<PathBuf, CatalogError> {
    let direct = Path::new(name);
    if direct.is_file() {
        return Ok(direct.to_path_buf());
    }

    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(dir) = data_dir {
        candidates.push(dir.join(name));
    }
    candidates.push(Path::new("data").join(name));
    candidates.push(Path::new("datafiles").join(name));

    candidates
        .into_iter()
        .find(|c| c.is_file())
        .ok_or_else(|| CatalogError::NotFound(name.to_string()))
}
