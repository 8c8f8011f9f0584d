use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::models::validator::{self, RawBatch};
use crate::store::RecordStore;

/// POST /api/upload-data — validate an uploaded dataset and admit it.
/// All-or-nothing: any failing record rejects the whole batch with a 400
/// listing every issue, and the store is left untouched.
pub async fn upload_data(
    store: web::Data<RecordStore>,
    body: web::Json<RawBatch>,
) -> Result<HttpResponse, AppError> {
    ingest(&store, &body, "Data uploaded successfully")
}

/// POST /api/load-sample-data — same ingestion path, kept as a separate
/// route so the frontend's demo button has a stable target.
pub async fn load_sample_data(
    store: web::Data<RecordStore>,
    body: web::Json<RawBatch>,
) -> Result<HttpResponse, AppError> {
    ingest(&store, &body, "Sample data loaded successfully")
}

fn ingest(
    store: &RecordStore,
    batch: &RawBatch,
    message: &str,
) -> Result<HttpResponse, AppError> {
    let validated = validator::validate(batch).inspect_err(|e| {
        log::warn!("rejected upload: {e}");
    })?;
    let ack = store.ingest(validated, message);
    log::info!(
        "ingested batch: {} resource(s), {} trial(s)",
        ack.resources_count,
        ack.trials_count
    );
    Ok(HttpResponse::Ok().json(ack))
}
