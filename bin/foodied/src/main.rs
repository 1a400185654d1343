//! `foodied` — the foodie server binary.
//!
//! Usage:
//!   foodied -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/foodie/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod auth_middleware;
mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use jsonwebtoken::{DecodingKey, Validation};
use tracing::{info, warn};

use foodie_core::Module;

use auth_middleware::JwtState;
use config::ServerConfig;

/// Foodie server.
#[derive(Parser, Debug)]
#[command(name = "foodied", about = "Foodie server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides default 0.0.0.0:8080).
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;
    config::verify_config(&server_config)?;

    // Initialize storage.
    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    // One embedded store shared by all modules.
    let kv: Arc<dyn foodie_kv::KvStore> = Arc::new(
        foodie_kv::RedbStore::open(&data_dir.join("foodie.redb"))
            .map_err(|e| anyhow::anyhow!("failed to open KV store: {}", e))?,
    );

    // Modules.
    let user_config = user::service::UserConfig {
        jwt_secret: server_config.jwt.secret.clone(),
        token_ttl: server_config.jwt.expire_secs,
    };
    let user_module = user::UserModule::new(Arc::clone(&kv), user_config);
    info!("User module initialized");

    let comment_module = comment::CommentModule::new(Arc::clone(&kv));
    info!("Comment module initialized");

    let restaurant_module = restaurant::RestaurantModule::new(Arc::clone(&kv));
    info!("Restaurant module initialized");

    // Places discovery rides on the restaurant module.
    if server_config.places.api_key.is_empty() {
        warn!("No Google Places API key configured; /api/places/find will fail");
    }
    let places_state = restaurant::places::PlacesState {
        restaurants: restaurant_module.service().clone(),
        users: user_module.service().clone(),
        client: Arc::new(restaurant::places::GooglePlacesClient::new(
            server_config.places.api_key.clone(),
        )),
    };
    let places_routes = restaurant::places::router(places_state);

    let module_routes = vec![
        (user_module.name(), user_module.routes()),
        (comment_module.name(), comment_module.routes()),
        (restaurant_module.name(), restaurant_module.routes()),
    ];

    // Build JWT state for middleware.
    let jwt_state = Arc::new(JwtState {
        decoding_key: DecodingKey::from_secret(server_config.jwt.secret.as_bytes()),
        validation: Validation::default(),
    });

    // Build router.
    let app = routes::build_router(jwt_state, module_routes, places_routes);

    // Start server.
    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("Foodie server listening on {}", cli.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
