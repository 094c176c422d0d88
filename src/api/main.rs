use axum::{Router, response::Json, routing::get};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use altee_api::middleware;
use altee_api::routes::{self, AppState};

// Panic hook to catch and log panics
fn setup_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC occurred!");
        if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            eprintln!("Panic message: {}", s);
        }
        if let Some(location) = panic_info.location() {
            eprintln!(
                "Panic location: {}:{}:{}",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!("Backtrace:\n{:?}", std::backtrace::Backtrace::capture());
    }));
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    setup_panic_hook();

    // RUST_LOG environment variable controls log level (default: info)
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false) // Disable ANSI colors for log files
        .init();

    info!("Application starting...");

    let app_state = AppState::from_env().await?;

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/health", get(health_check))
        .nest("/api/v1", routes::create_api_router())
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::create_cors_layer()),
        );

    let port = std::env::var("PORT").unwrap_or_else(|_| "8081".to_string());
    let addr = format!("0.0.0.0:{}", port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// GET /health - Liveness probe
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
