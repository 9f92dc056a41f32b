//! ctxlog demo server
//!
//! A small axum service showing request-scoped fields end to end.
//!
//! ```text
//!     Client Request
//!     ─────────────▶ TraceLayer ─▶ request_fields ─▶ tag_user ─▶ handler
//!                        │              │               │           │
//!                        │        request_id,      user field   order_id field
//!                        │        method, path                      │
//!                        ▼                                          ▼
//!                  tracing event ─▶ bridge ─────────────────▶ Logger ─▶ Sink
//! ```
//!
//! Usage: `ctxlog-demo [--config log.toml] [--bind 127.0.0.1:8080]`

use std::path::PathBuf;

use axum::extract::{Path, Request};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use ctxlog::adapter::request_fields;
use ctxlog::{debugf, infof, warnf, Carrier, LogConfig, RequestFieldsExt};

#[derive(Parser)]
#[command(name = "ctxlog-demo")]
#[command(about = "Demo HTTP service logging through ctxlog", long_about = None)]
struct Args {
    /// TOML file with the logger configuration.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, default_value = "127.0.0.1:8080")]
    bind: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ctxlog::load_config(path)?,
        None => LogConfig::default(),
    }
    .with_env_overrides();

    let logger = ctxlog::init(config);
    ctxlog::bridge::install();
    infof!((), "ctxlog-demo v0.1.0 starting, logging to {}", logger.destination());

    let listener = TcpListener::bind(&args.bind).await?;
    infof!((), "listening on {}", listener.local_addr()?);

    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    infof!((), "shutdown complete");
    ctxlog::flush();
    Ok(())
}

fn router() -> Router {
    Router::new()
        .route("/orders/{id}", get(get_order))
        .route("/health", get(health))
        .layer(middleware::from_fn(tag_user))
        .layer(middleware::from_fn(request_fields))
        .layer(TraceLayer::new_for_http())
}

/// Adds the caller's `x-user` header, if any, to the request's fields.
async fn tag_user(mut request: Request, next: Next) -> Response {
    let user = request
        .headers()
        .get("x-user")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    match user {
        Some(user) => {
            request.add_string("user", user);
            request.add_bool("authenticated", true);
        }
        None => request.add_bool("authenticated", false),
    }
    next.run(request).await
}

async fn get_order(Path(id): Path<i64>, carrier: Carrier) -> Result<String, StatusCode> {
    let ctx = carrier.with_int("order_id", id);
    debugf!(&ctx, "looking up order");

    if id <= 0 {
        warnf!(&ctx, "order {} does not exist", id);
        return Err(StatusCode::NOT_FOUND);
    }

    infof!(&ctx, "order {} found", id);
    Ok(format!("order {}\n", id))
}

async fn health() -> &'static str {
    "ok\n"
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // Without a signal handler, run until the process is killed.
        std::future::pending::<()>().await;
    }
    infof!((), "shutdown signal received");
}
