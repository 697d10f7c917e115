//! Content extraction
//!
//! Turns a fetched resource into plain text, metadata and (for HTML only) a
//! list of outbound links. The declared MIME type is resolved once into a
//! [`ContentKind`] and each kind has exactly one handler.
//!
//! Extraction never fails from the caller's point of view: disabled formats
//! produce a fixed "processing not available" message and broken documents
//! produce an `Error processing content: ...` placeholder.

#[cfg(feature = "docx")]
mod docx;
mod html;
#[cfg(feature = "pdf")]
mod pdf;

pub use html::{parse_html, ParsedPage};

use crate::config::ExtractionConfig;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use url::Url;

/// Text reported for PDF resources when PDF support is disabled
pub const PDF_UNAVAILABLE: &str = "PDF processing not available";

/// Text reported for DOCX resources when DOCX support is disabled
pub const DOCX_UNAVAILABLE: &str = "DOCX processing not available";

/// MIME type of Word documents
pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Errors raised while decoding a document body
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid PDF document: {0}")]
    Pdf(String),

    #[error("invalid DOCX document: {0}")]
    Docx(String),
}

/// The kinds of content the crawler knows how to handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentKind {
    Html,
    Pdf,
    Docx,
    /// Any `text/*` type other than HTML
    Text,
    Unsupported,
}

impl ContentKind {
    /// Resolves a declared Content-Type header value
    ///
    /// Matching is by substring, first match wins, in the order HTML, PDF,
    /// DOCX, other text. Parameters such as `; charset=utf-8` are ignored.
    ///
    /// ```
    /// use site_crawler::ContentKind;
    ///
    /// assert_eq!(ContentKind::from_content_type("text/html; charset=utf-8"), ContentKind::Html);
    /// assert_eq!(ContentKind::from_content_type("text/csv"), ContentKind::Text);
    /// assert_eq!(ContentKind::from_content_type("image/png"), ContentKind::Unsupported);
    /// ```
    pub fn from_content_type(content_type: &str) -> Self {
        let content_type = content_type.to_ascii_lowercase();

        if content_type.contains("text/html") {
            Self::Html
        } else if content_type.contains("application/pdf") {
            Self::Pdf
        } else if content_type.contains(DOCX_MIME) {
            Self::Docx
        } else if content_type.contains("text/") {
            Self::Text
        } else {
            Self::Unsupported
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Text => "text",
            Self::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document formats available to the extractor
///
/// Resolved once at startup from the compiled Cargo features and the
/// `[extraction]` configuration section, then handed to the [`Extractor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub pdf: bool,
    pub docx: bool,
}

impl Capabilities {
    /// Formats compiled into this build
    pub fn compiled() -> Self {
        Self {
            pdf: cfg!(feature = "pdf"),
            docx: cfg!(feature = "docx"),
        }
    }

    /// No document formats; HTML and text only
    pub fn none() -> Self {
        Self {
            pdf: false,
            docx: false,
        }
    }

    /// Intersects the configured formats with the compiled ones
    pub fn from_config(config: &ExtractionConfig) -> Self {
        let compiled = Self::compiled();

        if config.pdf && !compiled.pdf {
            tracing::warn!("PDF extraction requested but this build has no `pdf` feature");
        }
        if config.docx && !compiled.docx {
            tracing::warn!("DOCX extraction requested but this build has no `docx` feature");
        }

        Self {
            pdf: config.pdf && compiled.pdf,
            docx: config.docx && compiled.docx,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::compiled()
    }
}

/// Metadata discovered for a resource; absent keys are omitted when serialized
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

impl Metadata {
    /// Metadata carrying only a title
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.keywords.is_none()
    }
}

/// The outcome of extracting one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub kind: ContentKind,
    pub text: String,
    pub metadata: Metadata,
    /// Absolute URLs in discovery order; only HTML produces links
    pub links: Vec<String>,
}

/// Dispatches fetched content to the handler for its [`ContentKind`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Extractor {
    capabilities: Capabilities,
}

impl Extractor {
    pub fn new(capabilities: Capabilities) -> Self {
        Self { capabilities }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Extracts text, metadata and links from a fetched resource
    ///
    /// # Arguments
    ///
    /// * `page_url` - URL the content was served from; base for relative links
    /// * `content_type` - Declared Content-Type header value
    /// * `text` - Body decoded as (lossy) UTF-8
    /// * `bytes` - Raw body, used by binary formats
    pub fn extract(&self, page_url: &Url, content_type: &str, text: &str, bytes: &[u8]) -> Extraction {
        let kind = ContentKind::from_content_type(content_type);

        let result = match kind {
            ContentKind::Html => {
                let parsed = parse_html(text, page_url);
                Ok(Extraction {
                    kind,
                    text: parsed.text,
                    metadata: parsed.metadata,
                    links: parsed.links,
                })
            }
            ContentKind::Pdf => self.extract_pdf(bytes).map(|text| Extraction {
                kind,
                text,
                metadata: Metadata::titled(format!("PDF document from {}", page_url)),
                links: Vec::new(),
            }),
            ContentKind::Docx => self.extract_docx(bytes).map(|text| Extraction {
                kind,
                text,
                metadata: Metadata::titled(format!("DOCX document from {}", page_url)),
                links: Vec::new(),
            }),
            ContentKind::Text => Ok(Extraction {
                kind,
                text: text.to_string(),
                metadata: Metadata::titled(format!("Text document from {}", page_url)),
                links: Vec::new(),
            }),
            ContentKind::Unsupported => Ok(Extraction {
                kind,
                text: format!("Unsupported content type: {}", content_type),
                metadata: Metadata::titled(format!("Unsupported content from {}", page_url)),
                links: Vec::new(),
            }),
        };

        result.unwrap_or_else(|e| {
            tracing::warn!("Failed to extract {} content from {}: {}", kind, page_url, e);
            Extraction {
                kind,
                text: format!("Error processing content: {}", e),
                metadata: Metadata::titled(format!("Error processing {}", page_url)),
                links: Vec::new(),
            }
        })
    }

    fn extract_pdf(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        if !self.capabilities.pdf {
            return Ok(PDF_UNAVAILABLE.to_string());
        }

        #[cfg(feature = "pdf")]
        {
            pdf::extract_text(bytes)
        }

        #[cfg(not(feature = "pdf"))]
        {
            let _ = bytes;
            Ok(PDF_UNAVAILABLE.to_string())
        }
    }

    fn extract_docx(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        if !self.capabilities.docx {
            return Ok(DOCX_UNAVAILABLE.to_string());
        }

        #[cfg(feature = "docx")]
        {
            docx::extract_text(bytes)
        }

        #[cfg(not(feature = "docx"))]
        {
            let _ = bytes;
            Ok(DOCX_UNAVAILABLE.to_string())
        }
    }
}
