//! Core data models used throughout docglot.
//!
//! These types represent the paragraphs, chunks, and translated pieces that
//! flow through the extraction, translation, and reassembly pipeline.

/// Style name applied when a source format carries no style information.
pub const DEFAULT_STYLE: &str = "Normal";

/// A styled paragraph extracted from (or destined for) a document.
///
/// `index` is the paragraph's position in the document's non-empty paragraph
/// sequence, counted from zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub text: String,
    pub style: String,
    pub index: usize,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, style: impl Into<String>, index: usize) -> Self {
        Paragraph {
            text: text.into(),
            style: style.into(),
            index,
        }
    }
}

/// An ordered run of whole paragraphs small enough to translate in one
/// request. Chunks never interleave: walking them in order visits every
/// paragraph exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub paragraphs: Vec<Paragraph>,
    pub start_index: usize,
    pub word_count: usize,
}

impl Chunk {
    /// The chunk's paragraphs joined with a blank line, the form sent to the
    /// translation service.
    pub fn flattened_text(&self) -> String {
        let texts: Vec<&str> = self.paragraphs.iter().map(|p| p.text.as_str()).collect();
        texts.join("\n\n")
    }
}

/// A chunk's translated text paired with the chunk it came from.
#[derive(Debug, Clone)]
pub struct TranslatedChunk {
    pub text: String,
    pub source: Chunk,
}

/// Layout diagnostics gathered while extracting paged formats. Only built
/// for documents that extracted successfully; fatal conditions such as
/// encryption are errors, not diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    pub likely_scanned: bool,
    pub likely_multi_column: bool,
    pub page_count: usize,
}
