//! API route definitions.

use axum::Router;
use axum::routing::get;

use crate::handlers;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/applications",
            get(handlers::applications::list_applications)
                .post(handlers::applications::create_application),
        )
        .route(
            "/applications/{id}",
            get(handlers::applications::get_application)
                .put(handlers::applications::update_application)
                .delete(handlers::applications::delete_application),
        )
        .route(
            "/scopes",
            get(handlers::scopes::list_scopes).post(handlers::scopes::create_scope),
        )
        .route(
            "/scopes/{id}",
            get(handlers::scopes::get_scope)
                .put(handlers::scopes::update_scope)
                .delete(handlers::scopes::delete_scope),
        )
}
