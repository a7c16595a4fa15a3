use std::sync::Arc;

use anyhow::Context;

use tally_core::{Categorizer, KeywordTable};
use tally_ocr::{OcrBackend, ReceiptPipeline};
use tally_store::ExpenseStore;

mod config;
mod error;
mod routes;

use config::ServerConfig;
use routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally_server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::load()?;

    let table = match &config.keyword_table_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading keyword table {}", path.display()))?;
            KeywordTable::from_toml(&content).context("parsing keyword table")?
        }
        None => KeywordTable::default(),
    };
    let categorizer = Arc::new(Categorizer::new(table));

    let recognizer = build_recognizer();
    let pipeline = Arc::new(ReceiptPipeline::new(recognizer, (*categorizer).clone()));

    let state = AppState {
        store: Arc::new(ExpenseStore::new()),
        categorizer,
        header_mode: config.header_mode,
        pipeline,
    };

    let app = routes::build_router(state, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    tracing::info!("listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}

#[cfg(feature = "tesseract")]
fn build_recognizer() -> Box<dyn OcrBackend> {
    use tally_ocr::recognizer::tesseract_backend::TesseractRecognizer;
    Box::new(TesseractRecognizer::new(None, "eng"))
}

#[cfg(not(feature = "tesseract"))]
fn build_recognizer() -> Box<dyn OcrBackend> {
    // Without the `tesseract` feature image uploads OCR to empty text and
    // yield zero records; CSV and manual entry are unaffected.
    tracing::warn!("built without the `tesseract` feature; receipt OCR is disabled");
    Box::new(tally_ocr::MockRecognizer::new(""))
}
