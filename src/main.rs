use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use postbox_api::config::{init_db, Config};
use postbox_api::modules::auth::MySqlUserRepository;
use postbox_api::services::jwt::JwtService;
use postbox_api::services::license::{HttpLicenseValidator, LicenseManager, LicensePolicy};
use postbox_api::services::totp::TotpService;
use postbox_api::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "postbox_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load environment configuration");

    let db = init_db(&config.database_url)
        .await
        .expect("Failed to connect to MySQL");
    tracing::info!("Connected to MySQL");

    let validator = HttpLicenseValidator::new(
        config.license_server_url.clone(),
        Duration::from_secs(config.license_server_timeout_secs),
    )
    .expect("Failed to build license server client");

    let license = LicenseManager::new(
        config.license_key.clone(),
        LicensePolicy {
            grace_days: config.license_grace_days,
            warning_days: config.license_warning_days,
        },
        Arc::new(validator),
    );

    // An unreachable license server must not keep the API down
    match license.initialize().await {
        Ok(()) => tracing::info!("License initialized"),
        Err(e) => tracing::warn!(error = %e, "License validation failed at startup; running uninitialized"),
    }
    license.spawn_periodic_revalidation(Duration::from_secs(config.license_check_interval_secs.max(60)));

    let state = AppState {
        users: Arc::new(MySqlUserRepository::new(db)),
        license,
        jwt_service: JwtService::new(config.jwt_secret.clone()),
        totp: TotpService::new(config.app_name.clone()),
    };

    let app = postbox_api::create_app(state, config.two_factor_rate_limit_burst);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!("Server running on http://{}", config.bind_addr);
    // peer addresses key the 2FA rate limiter for unauthenticated callers
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .expect("Server error");
}
