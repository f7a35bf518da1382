use axum::{
    Router,
    routing::{delete, get, patch, post},
    middleware::from_fn_with_state,
};

use http::{Method, header};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::{
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
    cors::CorsLayer,
};

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod state;
mod db;
mod crypto {
    pub mod field;
    pub mod password;
    pub mod token;
}

mod models {
    pub mod admin;
    pub mod member;
    pub mod message;
    pub mod event;
    pub mod campaign;
}

mod repositories {
    pub mod admin;
    pub mod member;
    pub mod message;
    pub mod event;
    pub mod campaign;
}

mod services {
    pub mod auth;
    pub mod members;
    pub mod campaigns;
}

mod handlers {
    pub mod auth;
    pub mod members;
    pub mod messages;
    pub mod events;
    pub mod campaigns;
    pub mod public;
}

mod middleware_layer {
    pub mod auth;
}

mod validation {
    pub mod auth;
    pub mod forms;
}

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    tracing::info!("✅ Configuration loaded successfully");

    let state = AppState::new(&config)?;
    tracing::info!("✅ AppState initialized");

    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse().unwrap(),
            "http://127.0.0.1:3000".parse().unwrap(),
        ])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::COOKIE,
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400));

    let auth_governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(10)
            .use_headers()
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?,
    );

    let public_routes = Router::new()
        .route("/api/public/applications", post(handlers::public::submit_application))
        .route("/api/public/messages", post(handlers::public::submit_message))
        .route("/api/public/events", get(handlers::public::list_active_events))
        .with_state(state.clone());

    // Login and registration are rate-limited; logout succeeds
    // unconditionally, it only clears the client cookie.
    let auth_routes = Router::new()
        .route("/api/admin/register", post(handlers::auth::register))
        .route("/api/admin/login", post(handlers::auth::login))
        .route("/api/admin/logout", post(handlers::auth::logout))
        .layer(tower_governor::GovernorLayer::new(auth_governor_conf))
        .with_state(state.clone());

    let admin_routes = Router::new()
        .route("/api/admin/me", get(handlers::auth::me))
        .route("/api/admin/members", get(handlers::members::list_members))
        .route("/api/admin/members/export", get(handlers::members::export_members))
        .route(
            "/api/admin/members/{member_id}",
            patch(handlers::members::update_member_status),
        )
        .route("/api/admin/messages", get(handlers::messages::list_messages))
        .route(
            "/api/admin/messages/{message_id}",
            patch(handlers::messages::mark_read),
        )
        .route("/api/admin/campaigns", post(handlers::campaigns::create_campaign))
        .route("/api/admin/campaigns", get(handlers::campaigns::list_campaigns))
        .route("/api/admin/events", get(handlers::events::list_events))
        .route("/api/admin/events", post(handlers::events::create_event))
        .route(
            "/api/admin/events/{event_id}",
            patch(handlers::events::set_event_active),
        )
        .route(
            "/api/admin/events/{event_id}",
            delete(handlers::events::delete_event),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_admin,
        ))
        .with_state(state.clone());

    let app = Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(admin_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
