use std::sync::Arc;

use trading_sim::{ Config, Result };
use trading_sim::crypto::SessionSigner;
use trading_sim::db::{ SessionRepository, UserRepository, LedgerRepository };
use trading_sim::enums::AdminRole;
use trading_sim::services::{ AuthService, SessionService };
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt };

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "trading_sim=debug,tower_http=debug".into())
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| trading_sim::AppError::Config(e.to_string()))?;

    tracing::info!("Starting trading-sim in {:?} mode", config.environment);
    if config.external_api_url.is_some() {
        tracing::debug!("EXTERNAL_API_URL is set but no sync integration is enabled");
    }

    // Connect and run migrations
    let db = trading_sim::db::connect(&config.database_url).await?;

    tracing::info!("Database connected and migrated");

    // Seed the bootstrap administrator
    if let Some(bootstrap) = &config.bootstrap_admin {
        let auth = AuthService::new(
            Arc::new(UserRepository::new(db.clone())),
            Arc::new(LedgerRepository::new(db.clone()))
        );
        auth.ensure_admin(&bootstrap.email, &bootstrap.password, AdminRole::SuperAdmin).await?;
    }

    // Sessions
    let signer = SessionSigner::new(&config.session_secret)?;
    let session_service = SessionService::new(
        Arc::new(SessionRepository::new(db.clone())),
        signer,
        config.session_ttl_seconds,
        config.secure_cookies()
    );

    let purged = session_service.purge_expired().await?;
    if purged > 0 {
        tracing::info!("Removed {} expired sessions", purged);
    }

    // Build application router
    let app_state = trading_sim::api::AppState::new(db, session_service);
    let app = trading_sim::api::router(app_state);

    // Start server
    let addr = config.bind_address();
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener
        ::bind(&addr).await
        .map_err(|e| trading_sim::AppError::Internal(e.to_string()))?;

    axum::serve(listener, app).await.map_err(|e| trading_sim::AppError::Internal(e.to_string()))?;

    Ok(())
}
