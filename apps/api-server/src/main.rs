//! # PixPost API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::dev::{ServiceRequest, ServiceResponse, fn_service};
use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;

use config::AppConfig;
use pixpost_infra::MongoConnection;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = AppConfig::from_env();

    tracing::info!(
        "Starting PixPost API Server on {}:{}",
        config.host,
        config.port
    );

    // Explicit connection lifecycle: connect once here, shut down on exit.
    let connection = MongoConnection::connect(&config.database)
        .await
        .map_err(std::io::Error::other)?;

    // Build application state
    let state = AppState::new(&config, &connection)
        .await
        .map_err(std::io::Error::other)?;

    let cors_origin = config.cors_origin.clone();
    let uploads_dir = config.uploads_dir.clone();
    let public_dir = config.public_dir.clone();

    // Start HTTP server
    HttpServer::new(move || {
        let cors = match cors_origin.as_deref() {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header(),
            None => Cors::default(),
        };

        let index_file = std::path::Path::new(&public_dir).join("index.html");

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
            .service(Files::new("/uploads", uploads_dir.clone()))
            .service(
                Files::new("/", public_dir.clone())
                    .index_file("index.html")
                    // Unmapped paths fall back to the static index page.
                    .default_handler(fn_service(move |req: ServiceRequest| {
                        let index_file = index_file.clone();
                        async move {
                            let (req, _) = req.into_parts();
                            let file = NamedFile::open_async(&index_file).await?;
                            let res = file.into_response(&req);
                            Ok(ServiceResponse::new(req, res))
                        }
                    })),
            )
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    connection.shutdown().await;
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,api_server=debug,pixpost_infra=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}
