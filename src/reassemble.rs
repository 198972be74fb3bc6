//! Positional reassembly of translated chunks into a paragraph sequence.
//!
//! Translation output is untrusted: the service may merge paragraphs, split
//! them, or add its own blank lines. Reassembly therefore never fails. Each
//! chunk's output text is split back into paragraphs and paired with the
//! chunk's input paragraphs by position to recover styles; any excess output
//! paragraphs inherit the style of the chunk's last input paragraph.

use crate::models::{Paragraph, TranslatedChunk, DEFAULT_STYLE};

/// Rebuild the output paragraph sequence from translated chunks, in chunk
/// order. Paragraph indices are renumbered to match the new document.
pub fn reassemble(translated: &[TranslatedChunk]) -> Vec<Paragraph> {
    let mut out: Vec<Paragraph> = Vec::new();
    for chunk in translated {
        let inputs = &chunk.source.paragraphs;
        for (pos, text) in split_output(&chunk.text).into_iter().enumerate() {
            let style = inputs
                .get(pos)
                .or_else(|| inputs.last())
                .map(|p| p.style.clone())
                .unwrap_or_else(|| DEFAULT_STYLE.to_string());
            let index = out.len();
            out.push(Paragraph { text, style, index });
        }
    }
    out
}

/// Split a chunk's output on blank lines into trimmed paragraph texts.
///
/// Empty pieces are dropped, with one exception: output that splits into a
/// single piece keeps that piece even when it is empty, so a chunk always
/// leaves a trace in the document.
fn split_output(text: &str) -> Vec<String> {
    let pieces: Vec<String> = text.split("\n\n").map(|p| p.trim().to_string()).collect();
    if pieces.len() == 1 {
        return pieces;
    }
    pieces.into_iter().filter(|p| !p.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Chunk;

    fn chunk_of(paragraphs: Vec<(&str, &str)>) -> Chunk {
        let paragraphs: Vec<Paragraph> = paragraphs
            .into_iter()
            .enumerate()
            .map(|(i, (text, style))| Paragraph::new(text, style, i))
            .collect();
        let word_count = paragraphs.iter().map(|p| crate::chunk::count_words(&p.text)).sum();
        Chunk {
            start_index: paragraphs.first().map(|p| p.index).unwrap_or(0),
            paragraphs,
            word_count,
        }
    }

    fn translated(chunk: Chunk, text: &str) -> TranslatedChunk {
        TranslatedChunk {
            text: text.to_string(),
            source: chunk,
        }
    }

    #[test]
    fn test_one_to_one_styles_carry_over() {
        let tc = translated(
            chunk_of(vec![("Hello world.", "Heading1")]),
            "Bonjour le monde.",
        );
        let out = reassemble(&[tc]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "Bonjour le monde.");
        assert_eq!(out[0].style, "Heading1");
        assert_eq!(out[0].index, 0);
    }

    #[test]
    fn test_excess_output_inherits_last_style() {
        let tc = translated(
            chunk_of(vec![("Title", "Heading1"), ("Body text.", "Normal")]),
            "Titre\n\nCorps du texte.\n\nPhrase ajoutée.",
        );
        let out = reassemble(&[tc]);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].style, "Heading1");
        assert_eq!(out[1].style, "Normal");
        assert_eq!(out[2].style, "Normal");
        assert_eq!(out[2].text, "Phrase ajoutée.");
    }

    #[test]
    fn test_merged_output_drops_trailing_inputs() {
        // The service collapsed two paragraphs into one; the second input's
        // style simply goes unused.
        let tc = translated(
            chunk_of(vec![("One.", "Heading1"), ("Two.", "Normal")]),
            "Un. Deux.",
        );
        let out = reassemble(&[tc]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].style, "Heading1");
    }

    #[test]
    fn test_sole_empty_output_is_kept() {
        let tc = translated(chunk_of(vec![("Something.", "Quote")]), "");
        let out = reassemble(&[tc]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "");
        assert_eq!(out[0].style, "Quote");
    }

    #[test]
    fn test_blank_pieces_dropped_when_split_occurs() {
        let tc = translated(
            chunk_of(vec![("A.", "Normal"), ("B.", "Normal")]),
            "Premier.\n\n\n\nSecond.",
        );
        let out = reassemble(&[tc]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].text, "Premier.");
        assert_eq!(out[1].text, "Second.");
    }

    #[test]
    fn test_output_trimmed_per_paragraph() {
        let tc = translated(
            chunk_of(vec![("A.", "Normal"), ("B.", "Normal")]),
            "  Premier. \n\n\tSecond.\n",
        );
        let out = reassemble(&[tc]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].text, "Premier.");
        assert_eq!(out[1].text, "Second.");
    }

    #[test]
    fn test_indices_renumbered_across_chunks() {
        let first = translated(
            chunk_of(vec![("A.", "Heading1")]),
            "Un.\n\nDeux.",
        );
        let second = translated(chunk_of(vec![("B.", "Normal")]), "Trois.");
        let out = reassemble(&[first, second]);
        assert_eq!(out.len(), 3);
        let indices: Vec<usize> = out.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(out[2].text, "Trois.");
        assert_eq!(out[2].style, "Normal");
    }

    #[test]
    fn test_no_chunks_yields_empty_document() {
        assert!(reassemble(&[]).is_empty());
    }
}
