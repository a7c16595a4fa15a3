use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use tally_core::{Categorizer, ExpenseRecord};
use tally_import::{ingest_csv, CsvOptions, HeaderMode};
use tally_ocr::{OcrBackend, ReceiptPipeline};
use tally_store::ExpenseStore;

use crate::error::ApiError;

/// Shared application state. The store is the single mutable resource; its
/// lock provides the serialization contract for concurrent requests.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ExpenseStore>,
    pub categorizer: Arc<Categorizer>,
    pub header_mode: HeaderMode,
    pub pipeline: Arc<ReceiptPipeline<Box<dyn OcrBackend>>>,
}

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/expenses", get(list_expenses))
        .route("/summary", get(summary))
        .route("/clear", post(clear));

    Router::new()
        .route("/upload", post(upload))
        .route("/manual", post(add_manual))
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Multipart file upload: `.csv` goes through the CSV ingestor, images
/// through the receipt OCR pipeline. Ingestion is all-or-nothing, so a bad
/// file appends no records at all.
async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        let data = field.bytes().await?;

        let records = match extension.as_str() {
            "csv" => {
                let options = CsvOptions { header_mode: state.header_mode };
                ingest_csv(data.as_ref(), &options, &state.categorizer)?
            }
            "png" | "jpg" | "jpeg" => state.pipeline.process_bytes(&data)?,
            _ => return Err(ApiError::UnsupportedFileType(filename)),
        };

        let added = records.len();
        state.store.append_all(records);
        tracing::info!(file = %filename, added, "ingested upload");
        return Ok(Json(json!({ "message": "File processed successfully", "added": added })));
    }

    Err(ApiError::MissingFile)
}

#[derive(Debug, Deserialize)]
struct ManualExpense {
    description: String,
    /// Kept raw so a non-decimal amount is a handler-level 400, not an
    /// extractor rejection.
    amount: serde_json::Value,
}

fn parse_manual_amount(value: &serde_json::Value) -> Option<Decimal> {
    use std::str::FromStr;
    let text = match value {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

async fn add_manual(
    State(state): State<AppState>,
    Json(payload): Json<ManualExpense>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if payload.description.trim().is_empty() {
        return Err(ApiError::InvalidPayload("description must not be empty".into()));
    }
    let amount = parse_manual_amount(&payload.amount)
        .ok_or_else(|| ApiError::InvalidPayload("Invalid amount format".into()))?;

    let record = ExpenseRecord::categorized(payload.description, amount, &state.categorizer);
    state.store.append(record);
    Ok(Json(json!({ "message": "Expense added successfully" })))
}

async fn list_expenses(State(state): State<AppState>) -> Json<Vec<ExpenseRecord>> {
    Json(state.store.list_all())
}

async fn summary(
    State(state): State<AppState>,
) -> Json<std::collections::BTreeMap<tally_core::Category, Decimal>> {
    Json(state.store.summarize())
}

async fn clear(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.store.clear();
    Json(json!({ "message": "All expenses cleared" }))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
