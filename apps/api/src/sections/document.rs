//! Document text extraction for uploaded résumés.
//! Decoding is delegated to `pdf-extract`; plain text is taken as UTF-8.

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    PlainText,
}

impl DocumentFormat {
    pub fn from_file_name(name: &str) -> Result<Self, AppError> {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "txt" | "text" => Ok(DocumentFormat::PlainText),
            "" => Err(AppError::Validation(format!(
                "Cannot determine document type of '{name}'"
            ))),
            other => Err(AppError::Validation(format!(
                "Unsupported document type '.{other}'; upload a .pdf or .txt file"
            ))),
        }
    }
}

/// Extracts text from `bytes`. PDF decoding runs on the blocking pool.
pub async fn extract_text(format: DocumentFormat, bytes: bytes::Bytes) -> Result<String, AppError> {
    match format {
        DocumentFormat::PlainText => String::from_utf8(bytes.to_vec()).map_err(|_| {
            AppError::UnprocessableEntity("Text file is not valid UTF-8".to_string())
        }),
        DocumentFormat::Pdf => tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes)
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}")))?
        .map_err(|e| AppError::UnprocessableEntity(format!("Could not read PDF: {e}"))),
    }
}
