use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_user_auth,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{
    admin_users, announcements, audit_logs, auth, events, fixtures, gallery, health, layouts,
    navigation, players, products, records, teams, transfers, users,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    // Create rate limiter if rate limiting is enabled (rate_limit_per_minute > 0)
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let state = AppState {
        pool,
        config: config.clone(),
        rate_limiter,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public site content (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/pages/:page/layout", get(layouts::resolve_page_layout))
        .route("/api/v1/navigation", get(navigation::get_navigation))
        .route("/api/v1/announcement", get(announcements::get_announcement))
        .route("/api/v1/players", get(players::list_players))
        .route("/api/v1/players/:id", get(players::get_player))
        .route("/api/v1/teams", get(teams::list_teams))
        .route("/api/v1/teams/:id", get(teams::get_team))
        .route("/api/v1/fixtures", get(fixtures::list_fixtures))
        .route("/api/v1/fixtures/:id", get(fixtures::get_fixture))
        .route("/api/v1/records", get(records::list_records))
        .route("/api/v1/records/:id", get(records::get_record))
        .route("/api/v1/gallery", get(gallery::list_gallery))
        .route("/api/v1/gallery/:id", get(gallery::get_gallery_item))
        .route("/api/v1/products", get(products::list_products))
        .route("/api/v1/products/:id", get(products::get_product));

    // Account lifecycle routes: registration, sign-in and token exchange
    // carry their own credential checks, so no auth middleware here
    let auth_routes = Router::new()
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/oauth", post(auth::oauth_login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/otp/status", get(auth::otp_status))
        .route("/api/v1/auth/otp/request", post(auth::otp_request))
        .route("/api/v1/auth/otp/verify", post(auth::otp_verify));

    // Routes for any signed-in user
    // Middleware order: auth runs first, then rate limiting (which needs the user ID)
    let user_routes = Router::new()
        .route("/api/v1/users/me", get(users::get_me).put(users::update_me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Admin area. JWT auth runs at the router level; role and permission
    // checks happen in the extractors, which read the profile from the
    // database on every request so revocations take effect immediately.
    let admin_routes = Router::new()
        // User administration
        .route("/api/v1/admin/users", get(admin_users::list_users))
        .route("/api/v1/admin/users/admins", post(admin_users::create_admin))
        .route(
            "/api/v1/admin/users/admins/:user_id",
            delete(admin_users::remove_admin),
        )
        .route(
            "/api/v1/admin/users/:user_id/block",
            post(admin_users::block_user),
        )
        .route(
            "/api/v1/admin/users/:user_id/unblock",
            post(admin_users::unblock_user),
        )
        // Super Admin transfer handshake
        .route(
            "/api/v1/admin/transfers",
            get(transfers::list_transfers).post(transfers::create_transfer),
        )
        .route(
            "/api/v1/admin/transfers/accept",
            post(transfers::accept_transfer),
        )
        .route(
            "/api/v1/admin/transfers/:target_id/complete",
            post(transfers::complete_transfer),
        )
        .route(
            "/api/v1/admin/transfers/:target_id",
            delete(transfers::cancel_transfer),
        )
        // Audit trail
        .route("/api/v1/admin/audit-logs", get(audit_logs::list_audit_logs))
        // Layouts and events
        .route(
            "/api/v1/admin/layouts",
            get(layouts::list_layouts).post(layouts::create_layout),
        )
        .route(
            "/api/v1/admin/layouts/:id",
            get(layouts::get_layout)
                .put(layouts::update_layout)
                .delete(layouts::delete_layout),
        )
        .route(
            "/api/v1/admin/layouts/:id/activate",
            post(layouts::activate_layout),
        )
        .route(
            "/api/v1/admin/events",
            get(events::list_events).post(events::create_event),
        )
        .route(
            "/api/v1/admin/events/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        // Content management
        .route("/api/v1/admin/players", post(players::create_player))
        .route(
            "/api/v1/admin/players/:id",
            put(players::update_player).delete(players::delete_player),
        )
        .route("/api/v1/admin/teams", post(teams::create_team))
        .route(
            "/api/v1/admin/teams/:id",
            put(teams::update_team).delete(teams::delete_team),
        )
        .route("/api/v1/admin/fixtures", post(fixtures::create_fixture))
        .route(
            "/api/v1/admin/fixtures/:id",
            put(fixtures::update_fixture).delete(fixtures::delete_fixture),
        )
        .route("/api/v1/admin/records", post(records::create_record))
        .route(
            "/api/v1/admin/records/:id",
            put(records::update_record).delete(records::delete_record),
        )
        .route("/api/v1/admin/gallery", post(gallery::create_gallery_item))
        .route(
            "/api/v1/admin/gallery/:id",
            put(gallery::update_gallery_item).delete(gallery::delete_gallery_item),
        )
        .route("/api/v1/admin/products", post(products::create_product))
        .route(
            "/api/v1/admin/products/:id",
            put(products::update_product).delete(products::delete_product),
        )
        .route(
            "/api/v1/admin/navigation",
            get(navigation::list_navigation).put(navigation::replace_navigation),
        )
        .route(
            "/api/v1/admin/navigation/:id/visibility",
            post(navigation::set_link_visibility),
        )
        .route(
            "/api/v1/admin/announcement",
            get(announcements::get_announcement_admin).put(announcements::update_announcement),
        )
        // Rate limiting runs after auth (needs the user ID from the JWT)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(user_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
