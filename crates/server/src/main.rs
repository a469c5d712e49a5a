//! Beverly Technologies API server binary.
//!
//! Loads configuration, installs logging and Sentry, optionally seeds the
//! demo accounts, then serves the API until Ctrl+C or SIGTERM.

#![cfg_attr(not(test), forbid(unsafe_code))]

use beverly_server::config::ServerConfig;
use beverly_server::services::auth::DEFAULT_ACCOUNTS;
use beverly_server::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ServerConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some(config.environment.as_str().into()),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = ServerConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "beverly_server=info,tower_http=debug".into());

    // BEVERLY_LOG_JSON switches to one JSON object per line for log shippers
    let fmt_layer = if std::env::var_os("BEVERLY_LOG_JSON").is_some() {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if config.ephemeral_secret {
        tracing::warn!("JWT_SECRET not set, using a random secret; tokens will not survive a restart");
    }

    let state = AppState::new(config.clone());

    if config.seed_users {
        let seeded = state
            .auth()
            .seed_defaults()
            .await
            .expect("Failed to seed default accounts");
        if seeded {
            tracing::info!(count = DEFAULT_ACCOUNTS.len(), "Seeded default accounts");
            if config.expose_error_details {
                for (email, _, password, role) in DEFAULT_ACCOUNTS {
                    tracing::info!(%email, %password, role = role.as_str(), "Demo account");
                }
            }
        }
    }

    let app = beverly_server::app(state);

    // Start server
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!(
        environment = config.environment.as_str(),
        "API available at http://{}/api",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
