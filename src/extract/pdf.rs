use super::ExtractError;
use lopdf::Document;
use std::panic;

/// Extracts the text of every page, one page per line block
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractError> {
    // lopdf panics on some malformed cross-reference tables
    panic::catch_unwind(|| extract_pages(bytes))
        .unwrap_or_else(|_| Err(ExtractError::Pdf("parser panicked on malformed input".to_string())))
}

fn extract_pages(bytes: &[u8]) -> Result<String, ExtractError> {
    let document = Document::load_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))?;

    let mut text = String::new();
    for page_number in document.get_pages().keys() {
        match document.extract_text(&[*page_number]) {
            Ok(page_text) => {
                text.push_str(page_text.trim_end());
                text.push('\n');
            }
            Err(e) => {
                tracing::debug!("Skipping unreadable PDF page {}: {}", page_number, e);
            }
        }
    }

    Ok(text.trim().to_string())
}
