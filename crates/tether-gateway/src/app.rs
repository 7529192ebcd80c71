use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{
    analytics_handler, create_url_handler, deactivate_shorten_handler, deactivate_url_handler,
    health_handler, redirect_handler, redirect_shorten_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route(
                "/shorten",
                post(create_url_handler)
                    .get(redirect_shorten_handler)
                    .delete(deactivate_shorten_handler),
            )
            .route("/analytics/{short_code}", get(analytics_handler))
            .route(
                "/{short_code}",
                get(redirect_handler).delete(deactivate_url_handler),
            )
            .with_state(state)
            .layer(Self::cors())
            .layer(TraceLayer::new_for_http())
    }

    fn cors() -> CorsLayer {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
    }
}
