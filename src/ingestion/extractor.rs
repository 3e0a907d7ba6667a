//! PDF text extraction

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::error::{Error, Result};

/// How long a single PDF is allowed to spend in text extraction. Some PDFs
/// with unusual font tables make pdf-extract crawl; the pipeline must not
/// hang on them.
const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(60);

/// A document after text extraction
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Original filename of the upload
    pub filename: String,
    /// Concatenated text of all pages, in page order. Pages without
    /// extractable text contribute nothing; the whole string may be empty
    /// for image-only PDFs.
    pub text: String,
    /// Page count, when the document structure exposes it
    pub page_count: Option<u32>,
}

/// Extract text from one PDF byte stream.
///
/// Fails with [`Error::DocumentFormat`] when the bytes are not a parseable
/// PDF. An empty result is not an error by itself: a scanned PDF can parse
/// fine and still yield no text.
pub fn extract_text(filename: &str, data: &[u8]) -> Result<ExtractedDocument> {
    let text = match extract_with_timeout(filename, data) {
        Ok(text) => text,
        // Some malformed-but-loadable PDFs defeat the primary extractor;
        // lopdf's simpler text walk occasionally still gets the content out.
        Err(primary) => match extract_with_lopdf(data) {
            Some(text) => {
                tracing::warn!(filename, "primary extraction failed, used lopdf fallback");
                text
            }
            None => return Err(primary),
        },
    };

    // Null bytes occasionally leak out of broken content streams
    let text = text.replace('\0', "");

    let page_count = lopdf::Document::load_mem(data)
        .ok()
        .map(|doc| doc.get_pages().len() as u32);

    tracing::debug!(
        filename,
        chars = text.len(),
        pages = page_count,
        "extracted PDF text"
    );

    Ok(ExtractedDocument {
        filename: filename.to_string(),
        text,
        page_count,
    })
}

/// Fallback extraction through lopdf's page text walk. `None` when the
/// document does not load or yields no text at all.
fn extract_with_lopdf(data: &[u8]) -> Option<String> {
    let doc = lopdf::Document::load_mem(data).ok()?;
    let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    if pages.is_empty() {
        return None;
    }
    let text = doc.extract_text(&pages).ok()?;
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Run pdf-extract on a separate thread so a hang or panic inside the parser
/// cannot take the session down with it.
fn extract_with_timeout(filename: &str, data: &[u8]) -> Result<String> {
    let data_vec = data.to_vec();
    let (tx, rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        let result = pdf_extract::extract_text_from_mem(&data_vec);
        let _ = tx.send(result);
    });

    match rx.recv_timeout(EXTRACTION_TIMEOUT) {
        Ok(Ok(text)) => {
            let _ = handle.join();
            Ok(text)
        }
        Ok(Err(e)) => {
            let _ = handle.join();
            Err(Error::document_format(filename, e.to_string()))
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            // The extraction thread cannot be killed; leave it to finish on
            // its own and report the document as unprocessable.
            tracing::error!(filename, "PDF extraction timed out after 60s");
            Err(Error::document_format(filename, "text extraction timed out"))
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            tracing::error!(filename, "PDF extraction thread panicked");
            Err(Error::document_format(filename, "text extraction crashed"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_pdf_bytes() {
        let err = extract_text("notes.pdf", b"this is not a pdf").unwrap_err();
        assert!(matches!(err, Error::DocumentFormat { .. }));
    }

    #[test]
    fn rejects_empty_input() {
        let err = extract_text("empty.pdf", b"").unwrap_err();
        assert!(matches!(err, Error::DocumentFormat { .. }));
    }

    #[test]
    fn error_carries_the_filename() {
        let err = extract_text("report.pdf", b"%PDF-garbage").unwrap_err();
        assert!(err.to_string().contains("report.pdf"));
    }
}
