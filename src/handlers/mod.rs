pub mod dashboard;
pub mod upload;

use actix_web::{web, HttpResponse};

/// GET / — service banner.
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Clinical Trials Dashboard API",
        "status": "running"
    }))
}

/// GET /health — liveness probe.
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "healthy" }))
}

/// Configure every route the service exposes. Shared between `main` and the
/// HTTP-level tests so both run the exact same app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/health", web::get().to(health))
        .service(
            web::scope("/api")
                .route("/dashboard-summary", web::get().to(dashboard::summary))
                .route("/resources", web::get().to(dashboard::resources))
                .route("/trials", web::get().to(dashboard::trials))
                .route("/quarters", web::get().to(dashboard::quarters))
                .route("/bottlenecks", web::get().to(dashboard::bottlenecks))
                .route("/upload-data", web::post().to(upload::upload_data))
                .route("/load-sample-data", web::post().to(upload::load_sample_data)),
        );
}
