use rand::rngs::{StdRng, ThreadRng};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::warn;

use crate::models::{CourseRecord, SelectionStrategy};

/// Los créditos se comparan en centésimas en ambas estrategias.
const CREDIT_SCALE: f64 = 100.0;

/// Tamaño máximo de la tabla de `MaxCredits` (filas × columnas).
const MAX_TABLE_CELLS: usize = 1 << 16;

/// Orden aplicado al pool de candidatos antes de seleccionar.
///
/// En producción se baraja al azar; en tests se inyecta un orden fijo para
/// que las mismas entradas den siempre el mismo plan.
pub trait CandidateOrder {
    fn arrange(&mut self, pool: &mut [CourseRecord]);
}

impl<F> CandidateOrder for F
where
    F: FnMut(&mut [CourseRecord]),
{
    fn arrange(&mut self, pool: &mut [CourseRecord]) {
        self(pool)
    }
}

/// Deja el pool tal cual (orden de catálogo).
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepOrder;

impl CandidateOrder for KeepOrder {
    fn arrange(&mut self, _pool: &mut [CourseRecord]) {}
}

/// Orden alfabético por código.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByCode;

impl CandidateOrder for ByCode {
    fn arrange(&mut self, pool: &mut [CourseRecord]) {
        pool.sort_by(|a, b| a.code.cmp(&b.code));
    }
}

/// Permutación explícita: los códigos listados van primero en ese orden; el
/// resto conserva su orden relativo al final.
#[derive(Debug, Clone, Default)]
pub struct ExplicitOrder {
    codes: Vec<String>,
}

impl ExplicitOrder {
    pub fn new<S: AsRef<str>>(codes: &[S]) -> Self {
        ExplicitOrder { codes: codes.iter().map(|c| c.as_ref().to_string()).collect() }
    }
}

impl CandidateOrder for ExplicitOrder {
    fn arrange(&mut self, pool: &mut [CourseRecord]) {
        let rank = |code: &str| self.codes.iter().position(|c| c == code).unwrap_or(usize::MAX);
        // sort_by_key es estable: los no listados mantienen su orden
        pool.sort_by_key(|c| rank(&c.code));
    }
}

/// Barajado aleatorio sobre cualquier `Rng`.
#[derive(Debug, Clone)]
pub struct RandomOrder<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomOrder<R> {
    pub fn new(rng: R) -> Self {
        RandomOrder { rng }
    }
}

impl RandomOrder<ThreadRng> {
    pub fn thread() -> Self {
        RandomOrder::new(rand::thread_rng())
    }
}

impl RandomOrder<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        RandomOrder::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> CandidateOrder for RandomOrder<R> {
    fn arrange(&mut self, pool: &mut [CourseRecord]) {
        pool.shuffle(&mut self.rng);
    }
}

/// Acumula el pool ya ordenado respetando el techo de créditos y el máximo de cursos.
pub fn select_courses(
    ordered: &[CourseRecord],
    ceiling: f64,
    max_courses: usize,
    strategy: SelectionStrategy,
) -> Vec<CourseRecord> {
    match strategy {
        SelectionStrategy::FirstFit => first_fit(ordered, ceiling, max_courses),
        SelectionStrategy::MaxCredits => max_credits(ordered, ceiling, max_courses),
    }
}

/// Pasada greedy: agrega el curso si cabe; con o sin agregarlo, se detiene al
/// llegar al máximo de cursos o al techo.
fn first_fit(ordered: &[CourseRecord], ceiling: f64, max_courses: usize) -> Vec<CourseRecord> {
    let limit = scaled_ceiling(ceiling);
    let mut chosen: Vec<CourseRecord> = Vec::new();
    let mut total: u64 = 0;

    for course in ordered {
        if let Some(next) = total.checked_add(scaled(course.credits)).filter(|t| *t <= limit) {
            chosen.push(course.clone());
            total = next;
        }
        if chosen.len() >= max_courses || total >= limit {
            break;
        }
    }

    chosen
}

/// Créditos en centésimas, redondeando hacia arriba: la suma escalada nunca
/// subestima la real.
fn scaled(credits: f64) -> u64 {
    (credits * CREDIT_SCALE - 1e-9).ceil().max(0.0) as u64
}

fn scaled_ceiling(ceiling: f64) -> u64 {
    (ceiling * CREDIT_SCALE).floor().max(0.0) as u64
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Suma de créditos de un plan, redondeada a centésimas.
pub fn total_credits(courses: &[CourseRecord]) -> f64 {
    let sum: f64 = courses.iter().map(|c| c.credits).sum();
    (sum * CREDIT_SCALE).round() / CREDIT_SCALE
}

/// Mochila 0/1 acotada a `max_courses` elementos. Maximiza créditos; en empate
/// prefiere menos cursos y luego el primer subconjunto encontrado recorriendo
/// el orden recibido. Devuelve los cursos en el orden recibido.
///
/// La tabla se arma en unidades de `mcd(pesos)`; si aun así supera
/// `MAX_TABLE_CELLS` se usa `first_fit`.
fn max_credits(ordered: &[CourseRecord], ceiling: f64, max_courses: usize) -> Vec<CourseRecord> {
    if ordered.is_empty() || max_courses == 0 {
        return Vec::new();
    }

    let limit = scaled_ceiling(ceiling);
    let weights: Vec<u64> = ordered.iter().map(|c| scaled(c.credits)).collect();
    let fitting: Vec<usize> = (0..weights.len()).filter(|&i| weights[i] <= limit).collect();
    if fitting.is_empty() {
        return Vec::new();
    }

    // dividir por el mcd no cambia qué subconjuntos caben bajo el techo
    let step = fitting.iter().fold(0, |g, &i| gcd(g, weights[i])).max(1);
    let units: Vec<u64> = weights.iter().map(|w| w / step).collect();

    // nunca hace falta una capacidad mayor que la suma de los `max_courses` más pesados
    let mut heaviest: Vec<u64> = fitting.iter().map(|&i| units[i]).collect();
    heaviest.sort_unstable_by(|a, b| b.cmp(a));
    let reachable = heaviest.iter().take(max_courses).fold(0u64, |acc, w| acc.saturating_add(*w));
    let cap = (limit / step).min(reachable);

    let cells = usize::try_from(cap)
        .ok()
        .and_then(|c| c.checked_add(1))
        .and_then(|c| c.checked_mul(max_courses + 1));
    let cap = match cells {
        Some(n) if n <= MAX_TABLE_CELLS => cap as usize,
        _ => {
            warn!(cap, step, "credit values too fine-grained for max-credits, falling back to first-fit");
            return first_fit(ordered, ceiling, max_courses);
        }
    };

    // best[k][t] = índices (crecientes) de k cursos cuyo peso suma exactamente t
    let mut best: Vec<Vec<Option<Vec<usize>>>> = vec![vec![None; cap + 1]; max_courses + 1];
    best[0][0] = Some(Vec::new());

    for &i in fitting.iter() {
        if units[i] > cap as u64 {
            continue;
        }
        let w = units[i] as usize;
        for k in (1..=max_courses).rev() {
            let (lower, upper) = best.split_at_mut(k);
            let prev_row = &lower[k - 1];
            let row = &mut upper[0];
            for t in (w..=cap).rev() {
                if row[t].is_some() {
                    continue;
                }
                if let Some(prev) = &prev_row[t - w] {
                    let mut picked = prev.clone();
                    picked.push(i);
                    row[t] = Some(picked);
                }
            }
        }
    }

    for t in (0..=cap).rev() {
        for row in best.iter() {
            if let Some(picked) = &row[t] {
                return picked.iter().map(|&i| ordered[i].clone()).collect();
            }
        }
    }

    Vec::new()
}
