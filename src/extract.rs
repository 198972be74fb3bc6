//! Multi-format paragraph extraction for input documents.
//!
//! Takes a document path, returns the ordered non-empty paragraphs with their
//! style names, plus layout diagnostics for paged formats. Dispatch is by
//! file extension: `.docx` (WordprocessingML), `.txt` (plain text), `.pdf`.
//!
//! Only docx carries real style information; txt and pdf paragraphs all get
//! the default style.

use std::io::Read;
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{ExtractionReport, Paragraph, DEFAULT_STYLE};

/// Maximum decompressed bytes to read from a single ZIP entry (zip-bomb
/// protection).
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

/// A PDF whose whole extracted text is shorter than this is probably scanned
/// images, not text.
const SCANNED_TEXT_THRESHOLD: usize = 100;
/// Average line length below which a multi-page PDF smells multi-column.
const COLUMN_AVG_LINE_LEN: f64 = 50.0;
/// Line length counted as "short" for the second column heuristic.
const COLUMN_SHORT_LINE_LEN: usize = 40;
/// Fraction of short lines above which a multi-page PDF smells multi-column.
const COLUMN_SHORT_LINE_RATIO: f64 = 0.6;

/// Paragraph separator in plain text: a newline, optional whitespace, and
/// another newline.
static BLANK_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("invalid blank line pattern"));

/// Extraction error. The caller decides how to present each variant.
#[derive(Debug)]
pub enum ExtractError {
    UnsupportedFormat(String),
    Encrypted,
    Corrupt(String),
    Io(String),
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::UnsupportedFormat(ext) => {
                write!(f, "unsupported document format: {}", ext)
            }
            ExtractError::Encrypted => write!(f, "document is password-protected"),
            ExtractError::Corrupt(e) => write!(f, "document is corrupt or unreadable: {}", e),
            ExtractError::Io(e) => write!(f, "could not read document: {}", e),
        }
    }
}

impl std::error::Error for ExtractError {}

/// Extract paragraphs from a document on disk. Paged formats also return an
/// [`ExtractionReport`] with layout diagnostics.
pub fn extract_document(
    path: &Path,
) -> Result<(Vec<Paragraph>, Option<ExtractionReport>), ExtractError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "docx" => Ok((extract_docx(&read_bytes(path)?)?, None)),
        "txt" => Ok((extract_txt(&read_bytes(path)?), None)),
        "pdf" => {
            let (paragraphs, report) = extract_pdf(&read_bytes(path)?)?;
            Ok((paragraphs, Some(report)))
        }
        other => Err(ExtractError::UnsupportedFormat(other.to_string())),
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, ExtractError> {
    std::fs::read(path).map_err(|e| ExtractError::Io(e.to_string()))
}

// ============ docx ============

/// Extract styled paragraphs from a docx file's bytes.
pub fn extract_docx(bytes: &[u8]) -> Result<Vec<Paragraph>, ExtractError> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))
        .map_err(|e| ExtractError::Corrupt(e.to_string()))?;
    let doc_xml = read_zip_entry_bounded(&mut archive, "word/document.xml", MAX_XML_ENTRY_BYTES)?;
    parse_document_xml(&doc_xml)
}

fn read_zip_entry_bounded(
    archive: &mut zip::ZipArchive<std::io::Cursor<&[u8]>>,
    name: &str,
    max_bytes: u64,
) -> Result<Vec<u8>, ExtractError> {
    let entry = archive
        .by_name(name)
        .map_err(|e| ExtractError::Corrupt(format!("{}: {}", name, e)))?;
    let mut out = Vec::new();
    entry
        .take(max_bytes)
        .read_to_end(&mut out)
        .map_err(|e| ExtractError::Corrupt(e.to_string()))?;
    if out.len() as u64 >= max_bytes {
        return Err(ExtractError::Corrupt(format!(
            "ZIP entry {} exceeds size limit ({} bytes)",
            name, max_bytes
        )));
    }
    Ok(out)
}

/// Walk `word/document.xml` collecting body-level paragraphs.
///
/// Captures `w:t` runs, the `w:pStyle` value, tab and break characters.
/// Paragraphs inside tables are skipped, matching how word processors list
/// body paragraphs. Empty paragraphs are dropped.
fn parse_document_xml(xml: &[u8]) -> Result<Vec<Paragraph>, ExtractError> {
    use quick_xml::events::Event;

    let mut out: Vec<Paragraph> = Vec::new();
    let mut reader = quick_xml::Reader::from_reader(xml);
    let mut buf = Vec::new();

    let mut p_depth = 0usize;
    let mut tbl_depth = 0usize;
    let mut in_paragraph = false;
    let mut in_run = false;
    let mut in_text = false;
    let mut text = String::new();
    let mut style: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"tbl" => tbl_depth += 1,
                b"p" => {
                    p_depth += 1;
                    if p_depth == 1 && tbl_depth == 0 {
                        in_paragraph = true;
                        text.clear();
                        style = None;
                    }
                }
                b"pStyle" if in_paragraph => style = val_attribute(&e),
                b"r" if in_paragraph => in_run = true,
                b"t" if in_paragraph => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"pStyle" if in_paragraph => style = val_attribute(&e),
                b"tab" if in_run => text.push('\t'),
                b"br" | b"cr" if in_run => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                text.push_str(t.unescape().unwrap_or_default().as_ref());
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"tbl" => tbl_depth = tbl_depth.saturating_sub(1),
                b"p" => {
                    if p_depth == 1 && in_paragraph {
                        let trimmed = text.trim();
                        if !trimmed.is_empty() {
                            let index = out.len();
                            out.push(Paragraph::new(
                                trimmed,
                                style.clone().unwrap_or_else(|| DEFAULT_STYLE.to_string()),
                                index,
                            ));
                        }
                        in_paragraph = false;
                    }
                    p_depth = p_depth.saturating_sub(1);
                }
                b"r" => in_run = false,
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Corrupt(format!("word/document.xml: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

fn val_attribute(e: &quick_xml::events::BytesStart<'_>) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"w:val" {
            return Some(String::from_utf8_lossy(&attr.value).into_owned());
        }
    }
    None
}

// ============ txt ============

/// Extract paragraphs from a plain text file's bytes. Never fails: bytes that
/// are not UTF-8 are decoded as Windows-1252.
pub fn extract_txt(bytes: &[u8]) -> Vec<Paragraph> {
    let text = match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    };
    paragraphs_from_text(&text)
}

/// Split free text into paragraphs on blank lines, trimming each piece and
/// dropping empties. Single newlines stay embedded in their paragraph.
fn paragraphs_from_text(text: &str) -> Vec<Paragraph> {
    let mut out = Vec::new();
    for piece in BLANK_LINE.split(text) {
        let trimmed = piece.trim();
        if !trimmed.is_empty() {
            let index = out.len();
            out.push(Paragraph::new(trimmed, DEFAULT_STYLE, index));
        }
    }
    out
}

// ============ pdf ============

/// Extract paragraphs and layout diagnostics from a PDF's bytes.
///
/// The document structure is parsed first so password protection and page
/// count are known before any text extraction runs.
pub fn extract_pdf(bytes: &[u8]) -> Result<(Vec<Paragraph>, ExtractionReport), ExtractError> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| classify_pdf_error(&e.to_string()))?;
    if doc.is_encrypted() {
        return Err(ExtractError::Encrypted);
    }
    let page_count = doc.get_pages().len();

    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| classify_pdf_error(&e.to_string()))?;

    let report = ExtractionReport {
        likely_scanned: looks_scanned(&text),
        likely_multi_column: looks_multi_column(&text, page_count),
        page_count,
    };
    Ok((paragraphs_from_text(&text), report))
}

fn classify_pdf_error(detail: &str) -> ExtractError {
    let lower = detail.to_ascii_lowercase();
    if lower.contains("crypt") || lower.contains("password") {
        ExtractError::Encrypted
    } else {
        ExtractError::Corrupt(detail.to_string())
    }
}

/// Very little text in the whole document points at a scanned, image-based
/// PDF.
fn looks_scanned(text: &str) -> bool {
    text.trim().chars().count() < SCANNED_TEXT_THRESHOLD
}

/// Narrow lines across multiple pages point at a multi-column layout whose
/// reading order the extractor may have scrambled.
fn looks_multi_column(text: &str, page_count: usize) -> bool {
    if page_count <= 1 {
        return false;
    }
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        return false;
    }

    let total: usize = lines.iter().map(|l| l.chars().count()).sum();
    let avg = total as f64 / lines.len() as f64;
    if avg < COLUMN_AVG_LINE_LEN {
        return true;
    }

    let short = lines
        .iter()
        .filter(|l| l.chars().count() < COLUMN_SHORT_LINE_LEN)
        .count();
    short as f64 > lines.len() as f64 * COLUMN_SHORT_LINE_RATIO
}
