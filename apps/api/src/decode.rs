//! Document decoding: uploaded bytes to plain text ahead of analysis.
//!
//! PDF goes through `pdf_extract`; anything text-like must be valid UTF-8.
//! DOCX is a zip archive: the body lives in `word/document.xml`, one `w:p` per paragraph.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use tracing::{info, warn};
use zip::ZipArchive;

const DOCX_BODY: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unsupported document type: {0}")]
    Unsupported(String),

    #[error("Could not read DOCX: {0}")]
    Docx(String),

    #[error("Could not read PDF: {0}")]
    Pdf(String),

    #[error("Document is not valid UTF-8 text")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Document contains no text")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
    Docx,
}

impl DocumentKind {
    /// Detects the kind from the file extension, then the declared content type.
    pub fn detect(file_name: Option<&str>, content_type: Option<&str>) -> Result<Self, DecodeError> {
        let extension = file_name
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => return Ok(DocumentKind::Pdf),
            Some("txt" | "text" | "md") => return Ok(DocumentKind::PlainText),
            Some("docx") => return Ok(DocumentKind::Docx),
            _ => {}
        }

        let mime = content_type
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase());
        match mime.as_deref() {
            Some("application/pdf") => Ok(DocumentKind::Pdf),
            Some(m) if m.starts_with("text/") => Ok(DocumentKind::PlainText),
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document") => {
                Ok(DocumentKind::Docx)
            }
            _ => Err(DecodeError::Unsupported(
                file_name
                    .or(content_type)
                    .unwrap_or("unknown")
                    .to_string(),
            )),
        }
    }
}

/// Decodes `bytes` as `kind`. CPU-bound for PDFs; call from a blocking task.
pub fn extract_text(kind: DocumentKind, bytes: Vec<u8>) -> Result<String, DecodeError> {
    let text = match kind {
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            warn!("PDF extraction failed: {e}");
            DecodeError::Pdf(e.to_string())
        })?,
        DocumentKind::PlainText => String::from_utf8(bytes)?,
        DocumentKind::Docx => {
            docx_text(bytes).inspect_err(|e| warn!("DOCX extraction failed: {e}"))?
        }
    };

    if text.trim().is_empty() {
        return Err(DecodeError::Empty);
    }
    info!("Decoded {:?} document: {} chars", kind, text.len());
    Ok(text)
}

/// Paragraph texts of a DOCX body joined with newlines.
fn docx_text(bytes: Vec<u8>) -> Result<String, DecodeError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| DecodeError::Docx(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY)
        .map_err(|e| DecodeError::Docx(format!("{DOCX_BODY}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| DecodeError::Docx(e.to_string()))?;

    let mut reader = Reader::from_str(&xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| DecodeError::Docx(format!("at byte {}: {e}", reader.buffer_position())))?;
        match event {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                b"p" => paragraphs.push(String::new()),
                _ => {}
            },
            Event::Text(t) if in_text => {
                let text = t.unescape().map_err(|e| DecodeError::Docx(e.to_string()))?;
                current.push_str(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}
