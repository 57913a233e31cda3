// File: services/vetclinic_backend/src/lib.rs
use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use vetclinic_config::AppConfig;
use vetclinic_db::DbClient;

/// Prefix every feature router is nested under.
pub const API_PREFIX: &str = "/v1";

#[axum::debug_handler]
async fn health_handler(State(db): State<DbClient>) -> (StatusCode, Json<Value>) {
    if db.is_healthy().await {
        (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "ok" })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded", "database": "unavailable" })),
        )
    }
}

/// Assembles the application: `/health`, every feature router under
/// [`API_PREFIX`], request tracing and permissive CORS.
pub fn build_router(config: Arc<AppConfig>, db: DbClient) -> Router {
    let api_router = Router::new()
        .merge(vetclinic_audit::routes(db.clone()))
        .merge(vetclinic_billing::routes(config.clone(), db.clone()))
        .merge(vetclinic_clinic::routes(config, db.clone()))
        .merge(vetclinic_stats::routes(db.clone()));

    #[allow(unused_mut)] // only mutated with the openapi feature
    let mut app = Router::new()
        .route("/health", get(health_handler))
        .with_state(db)
        .nest(API_PREFIX, api_router);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use tracing::info;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;
        use vetclinic_audit::doc::AuditApiDoc;
        use vetclinic_billing::doc::BillingApiDoc;
        use vetclinic_clinic::doc::ClinicApiDoc;
        use vetclinic_stats::doc::StatsApiDoc;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "VetClinic API",
                version = "0.1.0",
                description = "Multi-tenant veterinary clinic backend",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            servers((url = "/v1", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(AuditApiDoc::openapi());
        openapi_doc.merge(BillingApiDoc::openapi());
        openapi_doc.merge(ClinicApiDoc::openapi());
        openapi_doc.merge(StatsApiDoc::openapi());
        info!("Adding Swagger UI at /docs");

        app = app.merge(SwaggerUi::new("/docs").url("/docs/openapi.json", openapi_doc));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
