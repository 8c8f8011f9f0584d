use actix_web::{middleware, web, App, HttpServer};

use trialboard::handlers;
use trialboard::store::RecordStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // Bind address — load from BIND_ADDR env var, default to localhost
    let bind_addr = match std::env::var("BIND_ADDR") {
        Ok(addr) => addr,
        Err(_) => {
            log::info!("No BIND_ADDR set — defaulting to 127.0.0.1:8000");
            "127.0.0.1:8000".to_string()
        }
    };

    // Single store instance for the whole process, injected into handlers.
    // In-memory only: restarting the service starts from an empty store.
    let store = web::Data::new(RecordStore::new());

    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(store.clone())
            .configure(handlers::configure)
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async {
                actix_web::HttpResponse::NotFound()
                    .json(serde_json::json!({ "error": "Not found" }))
            }))
    })
    .bind(bind_addr)?
    .run()
    .await
}
