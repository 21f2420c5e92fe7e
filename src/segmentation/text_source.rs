/*!
 * Source text loading for segmentation and isolation.
 *
 * PDFs are read through their text layer with `pdf-extract`; scanned PDFs without
 * a text layer yield little or no text (no OCR is attempted). Anything else is read
 * as UTF-8 text.
 */

use anyhow::{Context, Result};
use std::path::Path;

/// Read the text of a PDF or plain-text source file
pub fn load_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if is_pdf(path) {
        extract_pdf_text(path)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read text file: {}", path.display()))
    }
}

/// Extract the text layer of a PDF
pub fn extract_pdf_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let text = pdf_extract::extract_text(path)
        .with_context(|| format!("Failed to extract text from PDF: {}", path.display()))?;
    log::debug!("Extracted {} characters from {}", text.len(), path.display());
    Ok(text)
}

/// Extract the text layer of a PDF one page at a time, in page order
pub fn extract_pdf_pages<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read PDF: {}", path.display()))?;
    let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes)
        .with_context(|| format!("Failed to extract text from PDF: {}", path.display()))?;
    log::debug!("Extracted {} pages from {}", pages.len(), path.display());
    Ok(pages)
}

/// Case-insensitive `.pdf` extension check
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}
