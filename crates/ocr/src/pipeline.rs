use thiserror::Error;

use tally_core::{Categorizer, ExpenseRecord};

use crate::extract;
use crate::preprocess;
use crate::recognizer::{OcrBackend, OcrError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Image preprocessing failed: {0}")]
    Preprocess(#[from] preprocess::PreprocessError),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
}

/// Orchestrates: preprocess → OCR → line extraction → categorized records.
pub struct ReceiptPipeline<R: OcrBackend> {
    recognizer: R,
    categorizer: Categorizer,
}

impl<R: OcrBackend> ReceiptPipeline<R> {
    pub fn new(recognizer: R, categorizer: Categorizer) -> Self {
        Self { recognizer, categorizer }
    }

    /// Process raw image bytes (from an upload or camera capture).
    pub fn process_bytes(&self, data: &[u8]) -> Result<Vec<ExpenseRecord>, PipelineError> {
        let image_bytes = preprocess::prepare_for_ocr(data)?;
        let ocr_text = self.recognizer.recognize(&image_bytes)?;
        Ok(extract::extract_expenses(&ocr_text, &self.categorizer))
    }
}
