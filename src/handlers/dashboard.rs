use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::models::summary;
use crate::store::RecordStore;

/// GET /api/dashboard-summary — the precomputed dashboard header numbers.
/// Always succeeds; an empty store yields the well-defined empty summary.
pub async fn summary(store: web::Data<RecordStore>) -> Result<HttpResponse, AppError> {
    let summary = store.get_or_compute()?;
    Ok(HttpResponse::Ok().json(summary))
}

/// GET /api/resources — all stored resource records, quarter keys flattened.
pub async fn resources(store: web::Data<RecordStore>) -> Result<HttpResponse, AppError> {
    let snap = store.snapshot();
    Ok(HttpResponse::Ok().json(snap.resources))
}

/// GET /api/trials — all stored trials.
pub async fn trials(store: web::Data<RecordStore>) -> Result<HttpResponse, AppError> {
    let snap = store.snapshot();
    Ok(HttpResponse::Ok().json(snap.trials))
}

/// GET /api/quarters — distinct quarter labels in chronological order.
pub async fn quarters(store: web::Data<RecordStore>) -> Result<HttpResponse, AppError> {
    let snap = store.snapshot();
    let quarters = summary::sorted_quarter_labels(&snap.resources)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "quarters": quarters })))
}

/// GET /api/bottlenecks — per-area, per-quarter supply/demand balance.
/// 404 until data has been loaded.
pub async fn bottlenecks(store: web::Data<RecordStore>) -> Result<HttpResponse, AppError> {
    if store.is_empty() {
        return Err(AppError::NotFound("No data loaded"));
    }
    let snap = store.snapshot();
    let bottlenecks = summary::compute_bottlenecks(&snap.resources, &snap.trials)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "bottlenecks": bottlenecks })))
}
