use std::sync::Arc;

use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use crate::{
    middleware::{AdmissionLayer, catch_panic_layer, cors_layer, json_error_middleware},
    state::AppState,
};

pub mod api;
pub mod guards;
pub mod resolvers;

pub use guards::{ActiveUser, AdminUser, AuthRoleGuard};
pub use resolvers::{ResolvedComment, ResolvedTask};

/// API routes. Admission control wraps every matched route and runs before
/// any extractor, so a rejected request never reaches identity resolution.
pub fn router(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        .merge(api::token::router())
        .merge(api::tasks::router())
        .merge(api::comments::router())
        .merge(api::users::router());

    let routes = match state.admission.clone() {
        Some(control) => routes.route_layer(AdmissionLayer::new(control)),
        None => routes,
    };
    routes.with_state(state)
}

/// The full service: routes plus error normalisation, panic catching, CORS
/// and request tracing.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors);
    router(state)
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
