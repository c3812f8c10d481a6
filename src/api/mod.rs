pub mod cities;
pub mod error;
pub mod plans;
pub mod search;
pub mod server;
pub mod types;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::auth::require_api_key;
use crate::state::AppState;

pub use error::ApiError;
pub use types::ApiResponse;

/// Build the HTTP router / 构建路由
pub fn router(state: Arc<AppState>) -> Router {
    with_layers(routes(state.clone()), state)
}

/// `/health` and `/` are public; everything else sits behind the API key check.
fn routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let public = Router::new()
        .route("/health", get(server::health_check))
        .route("/", get(server::root_document));

    let protected = Router::new()
        .route("/search", get(search::quick_search))
        .route("/search/structured", post(search::structured_search))
        .route("/search/contextual", get(search::contextual_search))
        .route("/plans/:plan_number", get(plans::get_plan))
        .route("/cities", get(cities::list_cities))
        .route("/cities/:city/plans", get(cities::city_plans))
        .route("/recommendations/:plan_number", get(plans::recommendations))
        .route("/insights", get(cities::insights))
        .route("/insights/:city", get(cities::city_insights))
        .route("/export", post(search::export))
        .route("/stats", get(server::stats))
        .route_layer(middleware::from_fn_with_state(state, require_api_key));

    public.merge(protected).fallback(server::not_found)
}

fn with_layers(routes: Router<Arc<AppState>>, state: Arc<AppState>) -> Router {
    let development = state.config.is_development();

    routes
        .layer(CatchPanicLayer::custom(move |err: Box<dyn Any + Send + 'static>| {
            server::panic_response(err, development)
        }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
