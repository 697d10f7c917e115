use super::ExtractError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};

/// Archive member holding the main document body
const DOCUMENT_PART: &str = "word/document.xml";

/// Extracts paragraph text from a Word document, one paragraph per line
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractError::Docx(format!("{}: {}", DOCUMENT_PART, e)))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Docx(e.to_string()))?;

    let paragraphs = paragraphs_from_xml(&xml)?;
    Ok(paragraphs.join("\n").trim().to_string())
}

/// Walks WordprocessingML and returns the text of each body-level `<w:p>`
///
/// Paragraphs nested inside a paragraph (text boxes under `w:txbxContent`,
/// often duplicated through `mc:AlternateContent`) are skipped, so they can
/// neither split nor repeat the enclosing paragraph's text.
fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut paragraph_depth = 0usize;
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => {
                    paragraph_depth += 1;
                    if paragraph_depth == 1 {
                        current.clear();
                    }
                }
                b"w:t" => in_text_run = true,
                _ => {}
            },
            Ok(Event::Empty(e)) if paragraph_depth <= 1 => match e.name().as_ref() {
                b"w:p" if paragraph_depth == 0 => paragraphs.push(String::new()),
                b"w:tab" if paragraph_depth == 1 => current.push('\t'),
                b"w:br" | b"w:cr" if paragraph_depth == 1 => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run && paragraph_depth == 1 => {
                let text = t.unescape().map_err(|e| ExtractError::Docx(e.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => {
                    if paragraph_depth == 1 {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                    paragraph_depth = paragraph_depth.saturating_sub(1);
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractError::Docx(format!(
                    "malformed XML at byte {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}
