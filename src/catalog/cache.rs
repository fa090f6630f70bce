//! Caché simple en memoria para catálogos ya leídos
//!
//! `get_catalog_cached(path)` devuelve el catálogo de esa ruta como `Arc`,
//! leyéndolo de disco sólo la primera vez.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use tracing::debug;

use crate::catalog::CourseCatalog;
use crate::error::CatalogError;

// Caché global: ruta -> Arc<CourseCatalog>
static CATALOG_CACHE: OnceLock<Mutex<HashMap<String, Arc<CourseCatalog>>>> = OnceLock::new();
static CACHE_HITS: AtomicUsize = AtomicUsize::new(0);
static CACHE_MISSES: AtomicUsize = AtomicUsize::new(0);

/// Devuelve el catálogo de `path`, usando el caché si ya fue leído.
///
/// El mutex sólo se toma para consultar e insertar; la lectura de disco ocurre
/// fuera del bloqueo. Si dos llamadas leen a la vez, gana la primera inserción.
pub fn get_catalog_cached(path: &Path) -> Result<Arc<CourseCatalog>, CatalogError> {
    let cache = CATALOG_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let key = path.to_string_lossy().to_string();

    {
        let guard = cache.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = guard.get(&key) {
            CACHE_HITS.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(existing));
        }
    }

    CACHE_MISSES.fetch_add(1, Ordering::Relaxed);
    debug!(path = %key, "catalog cache miss");
    let loaded = Arc::new(CourseCatalog::load(path)?);

    let mut guard = cache.lock().unwrap_or_else(|e| e.into_inner());
    let entry = guard.entry(key).or_insert(loaded);
    Ok(Arc::clone(entry))
}

/// (hits, misses, entradas) del caché.
pub fn get_catalog_cache_stats() -> (usize, usize, usize) {
    let entries = CATALOG_CACHE
        .get()
        .map(|c| c.lock().unwrap_or_else(|e| e.into_inner()).len())
        .unwrap_or(0);
    (
        CACHE_HITS.load(Ordering::Relaxed),
        CACHE_MISSES.load(Ordering::Relaxed),
        entries,
    )
}
