// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{admin, content, posts, signup},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Public read routes (posts, features, FAQs, settings) and the beta signup.
/// * Admin routes behind token authentication + admin check.
/// * Global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let post_routes = Router::new()
        .route("/", get(posts::list_posts))
        .route("/{slug}", get(posts::get_post));

    let admin_routes = Router::new()
        .route("/posts", get(admin::list_posts).post(admin::create_post))
        .route(
            "/posts/{id}",
            put(admin::update_post).delete(admin::delete_post),
        )
        .route("/posts/{id}/export", get(admin::export_stored_post))
        .route("/export", post(admin::export_record))
        .route("/sanitize", post(admin::sanitize_preview))
        .route(
            "/features",
            get(admin::list_features).post(admin::create_feature),
        )
        .route(
            "/features/{id}",
            put(admin::update_feature).delete(admin::delete_feature),
        )
        .route("/faqs", get(admin::list_faqs).post(admin::create_faq))
        .route(
            "/faqs/{id}",
            put(admin::update_faq).delete(admin::delete_faq),
        )
        .route(
            "/settings",
            get(admin::get_settings).put(admin::save_settings),
        )
        .route("/signups", get(admin::list_signups))
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn_with_state(state.clone(), admin_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/posts", post_routes)
        .route("/api/features", get(content::list_features))
        .route("/api/faqs", get(content::list_faqs))
        .route("/api/settings", get(content::get_settings))
        .route("/api/signups", post(signup::create_signup))
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
