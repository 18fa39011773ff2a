use std::sync::Arc;

use komik_server::config::ServerConfig;
use komik_server::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present. Absence is fine; anything else is worth a
    // warning before tracing is up.
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: failed to load .env file: {e}");
        }
    }

    let config = match ServerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    komik_server::observability::init_tracing(&config.log_level);

    let pool = match komik_auth_postgres::connect(&config.database_url, config.max_connections)
        .await
    {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(error = %e, "database connection failed");
            std::process::exit(2);
        }
    };
    if let Err(e) = komik_auth_postgres::run_migrations(&pool).await {
        tracing::error!(error = %e, "migrations failed");
        std::process::exit(2);
    }

    let state = AppState::new(
        Arc::new(komik_auth_postgres::PgUserStorage::new(pool.clone())),
        Arc::new(komik_auth_postgres::PgSessionStorage::new(pool)),
        &config.auth,
    );
    let app = komik_server::build_app(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(error = %e, addr, "failed to bind listener");
            std::process::exit(2);
        }
    };

    tracing::info!(addr, "komik server listening");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
