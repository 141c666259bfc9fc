use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};
use anyhow::Result;

use overtime_hub::database::init_store;
use overtime_hub::middleware::RequestIdMiddleware;
use overtime_hub::{AppState, Config, routes};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("OvertimeHub API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting OvertimeHub API server...");

    // Load configuration
    let config = Config::from_env()?;
    log::info!("Configuration loaded (environment: {})", config.environment);
    if config.is_production() && config.uses_memory_store() {
        log::warn!("Production is running on the in-memory store");
    }

    // Initialize store
    let store = init_store(&config).await?;
    log::info!("Store initialized");

    let app_state = web::Data::new(AppState::new(store));
    let config_data = web::Data::new(config.clone());

    let server_address = config.server_address();
    log::info!("Server starting on http://{}", server_address);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = if config.is_development() {
            Cors::permissive()
        } else {
            Cors::default()
                .allowed_origin(&config.client_base_url)
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec![
                    "Authorization",
                    "Content-Type",
                    "Accept",
                    "X-Requested-With",
                    "X-Correlation-ID",
                ])
                .expose_headers(vec!["Content-Disposition", "X-Correlation-ID"])
                .max_age(3600)
        };

        App::new()
            .app_data(app_state.clone())
            .app_data(config_data.clone())
            .wrap(cors)
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .service(hello)
            .service(health)
            .configure(routes::configure)
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
