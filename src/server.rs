use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::algorithm::plan_for_catalog;
use crate::api_json::{normalize_request, resolve_audit_codes, PlanRequest};
use crate::catalog::{get_catalog_cached, resolve_catalog_path, CourseCatalog, RawCourseRecord};
use crate::config::AppConfig;
use crate::error::PlanError;
use crate::models::{
    AuditRecord, CompletedCourse, CourseRef, Difficulty, Plan, PreferenceSet, RequirementGroup, SelectionStrategy,
};

/// Estado compartido entre workers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Catálogo del servidor; `None` si no se pudo cargar al iniciar.
    pub catalog: Option<Arc<CourseCatalog>>,
    pub strategy: SelectionStrategy,
    pub seed: Option<u64>,
}

impl AppState {
    pub fn new(catalog: Option<Arc<CourseCatalog>>, strategy: SelectionStrategy, seed: Option<u64>) -> Self {
        AppState { catalog, strategy, seed }
    }

    /// Carga el catálogo configurado. Un fallo no impide arrancar: las
    /// solicitudes pueden traer su propio catálogo.
    pub fn from_config(config: &AppConfig) -> Self {
        let catalog = resolve_catalog_path(&config.catalog, config.data_dir.as_deref())
            .and_then(|path| get_catalog_cached(&path));
        let catalog = match catalog {
            Ok(c) => Some(c),
            Err(e) => {
                warn!("⚠️  no se pudo cargar el catálogo '{}': {}", config.catalog, e);
                None
            }
        };
        AppState::new(catalog, config.strategy, config.seed)
    }
}

/// Respuesta de `POST /plan`: el plan más la marca de tiempo de generación.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanResponse {
    #[serde(flatten)]
    plan: Plan,
    generated_at: DateTime<Utc>,
}

/// POST /plan
/// Genera un plan de semestre a partir de preferencias + auditoría.
async fn plan_handler(state: web::Data<AppState>, body: web::Json<serde_json::Value>) -> impl Responder {
    let req: PlanRequest = match serde_json::from_value(body.into_inner()) {
        Ok(r) => r,
        Err(e) => return HttpResponse::BadRequest().json(json!({"error": format!("failed to parse input: {}", e)})),
    };
    let PlanRequest { preferences, audit, catalog, seed, strategy } = normalize_request(req);

    // Catálogo de la solicitud si viene; si no, el del servidor
    let catalog: Arc<CourseCatalog> = match catalog {
        Some(raw) => {
            let (c, skipped) = CourseCatalog::from_raw(raw);
            if skipped > 0 {
                warn!(skipped, "request catalog contained malformed records");
            }
            Arc::new(c)
        }
        None => match &state.catalog {
            Some(c) => Arc::clone(c),
            None => {
                return HttpResponse::InternalServerError()
                    .json(json!({"error": "no course catalog loaded on the server and none provided"}));
            }
        },
    };

    let audit = resolve_audit_codes(audit, &catalog);
    let strategy = strategy.unwrap_or(state.strategy);
    let seed = seed.or(state.seed);

    match plan_for_catalog(&preferences, &audit, &catalog, seed, strategy) {
        Ok(plan) => {
            info!(
                courses = plan.plan.len(),
                total_credits = plan.total_credits,
                ceiling = plan.criteria.credit_load,
                "🗓️  plan generado"
            );
            HttpResponse::Ok().json(PlanResponse { plan, generated_at: Utc::now() })
        }
        Err(e @ PlanError::InvalidPreferences(_)) => HttpResponse::BadRequest().json(json!({"error": e.to_string()})),
        Err(e) => HttpResponse::InternalServerError().json(json!({"error": e.to_string()})),
    }
}

/// GET /catalog?subject=CS
/// Lista el catálogo del servidor, opcionalmente filtrado por materia.
async fn catalog_list_handler(
    state: web::Data<AppState>,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> impl Responder {
    let Some(catalog) = &state.catalog else {
        return HttpResponse::InternalServerError().json(json!({"error": "no course catalog loaded"}));
    };

    let subject = query.get("subject").map(|s| s.trim()).filter(|s| !s.is_empty());
    let courses: Vec<_> = match subject {
        Some(s) => catalog.by_subject(s),
        None => catalog.iter().collect(),
    };

    HttpResponse::Ok().json(json!({"count": courses.len(), "courses": courses}))
}

/// GET /catalog/{code}
async fn catalog_course_handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let code = path.into_inner();
    let Some(catalog) = &state.catalog else {
        return HttpResponse::InternalServerError().json(json!({"error": "no course catalog loaded"}));
    };

    match catalog.get(&code) {
        Some(course) => HttpResponse::Ok().json(course),
        None => HttpResponse::NotFound().json(json!({"error": format!("course '{}' not found", code)})),
    }
}

/// GET /
async fn index_handler() -> impl Responder {
    HttpResponse::Ok().json(json!({"message": "Welcome to the Schedule Sculptor API"}))
}

/// GET /help
/// Ejemplo de solicitud para `POST /plan`.
async fn help_handler() -> impl Responder {
    let example = PlanRequest {
        preferences: PreferenceSet {
            requirements: vec!["Major Core".to_string(), "General Education".to_string()],
            credit_load: vec![12, 15],
            difficulty: Difficulty::Moderate,
        },
        audit: AuditRecord {
            completed_courses: vec![CompletedCourse {
                code: "CS 111".to_string(),
                title: "Program Design I".to_string(),
                credits: Some(3.0),
                semester: "FA24".to_string(),
                grade: "A".to_string(),
            }],
            in_progress_courses: Vec::new(),
            remaining_requirements: vec![RequirementGroup {
                category: "Major Core".to_string(),
                courses_needed: 2,
                courses: vec![
                    CourseRef { code: "CS 141".to_string(), title: "Program Design II".to_string() },
                    CourseRef { code: "CS 151".to_string(), title: "Mathematical Foundations of Computing".to_string() },
                ],
            }],
        },
        catalog: Some(vec![RawCourseRecord {
            code: Some("CS 141".to_string()),
            title: Some("Program Design II".to_string()),
            credits: Some(crate::catalog::CreditsValue::Number(3.0)),
            prereqs: Some(crate::catalog::PrereqsValue::List(vec!["CS 111".to_string()])),
            ..Default::default()
        }]),
        seed: Some(42),
        strategy: Some(SelectionStrategy::FirstFit),
    };

    HttpResponse::Ok().json(json!({
        "description": "POST /plan genera un plan para el próximo semestre. 'catalog' es opcional: si falta se usa el catálogo del servidor. 'seed' hace el plan reproducible.",
        "post_example": example,
        "difficulty_choices": Difficulty::ALL,
        "strategy_choices": ["first-fit", "max-credits"],
        "routes": ["GET /", "GET /help", "GET /catalog?subject=CS", "GET /catalog/{code}", "POST /plan"]
    }))
}

/// Registra las rutas (reutilizado por los tests con `actix_web::test`).
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index_handler))
        .route("/help", web::get().to(help_handler))
        .route("/catalog", web::get().to(catalog_list_handler))
        .route("/catalog/{code}", web::get().to(catalog_course_handler))
        .route("/plan", web::post().to(plan_handler));
}

pub async fn run_server(config: AppConfig) -> std::io::Result<()> {
    let state = web::Data::new(AppState::from_config(&config));
    info!(bind = %config.bind, strategy = %config.strategy, "iniciando servidor");

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(config.bind)?
    .run()
    .await
}
