// Biblioteca raíz del crate `sculptor`.
// Reexporta los módulos principales y el motor de planes `generate_plan`,
// que combina preferencias + auditoría + catálogo en un `Plan`.
pub mod algorithm;
pub mod api_json;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod server;

pub use algorithm::{generate_plan, generate_plan_random, generate_plan_seeded};
pub use error::{CatalogError, PlanError, PreferenceIssue};

/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;
