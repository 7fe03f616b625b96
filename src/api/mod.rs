mod handlers;
pub mod middleware;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;

pub use handlers::FilterQuery;

/// Router with permissive CORS, as used for local serving and tests.
pub fn create_router(dashboard: Dashboard) -> Router {
    build_router(dashboard, CorsLayer::permissive())
}

/// Router honouring the configured CORS origins.
pub fn create_router_with_config(dashboard: Dashboard, config: &DashboardConfig) -> Router {
    build_router(
        dashboard,
        middleware::cors_layer(config.cors_origins.as_deref()),
    )
}

fn build_router(dashboard: Dashboard, cors: CorsLayer) -> Router {
    let api = Router::new()
        // Sections
        .route("/sections/{section}", get(handlers::get_section))
        // Aggregated views
        .route("/years", get(handlers::list_years))
        .route("/views/annual", get(handlers::annual_view))
        .route("/views/monthly", get(handlers::monthly_view))
        .route("/views/seasonal", get(handlers::seasonal_view))
        .route("/views/decadal", get(handlers::decadal_view))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .route("/", get(handlers::index))
        .route("/sections/{section}", get(handlers::section_page))
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(dashboard)
}
