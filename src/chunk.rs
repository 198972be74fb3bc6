//! Word-budget paragraph chunker.
//!
//! Splits a document's paragraph sequence into [`Chunk`]s that stay within a
//! configurable word budget without ever cutting a sentence in half.
//! Paragraphs are packed greedily in document order; a paragraph that is
//! itself over budget is split on sentence boundaries instead.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Chunk, Paragraph};

/// Sentence boundary: a run of terminal punctuation followed by whitespace.
static SENTENCE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+\s+").expect("invalid sentence boundary pattern"));

/// Count whitespace-delimited words. Any run of whitespace separates, so the
/// count is stable under reformatting.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Pack paragraphs into chunks of at most `max_words` words each.
///
/// Paragraphs are walked once in order. A paragraph that fits the remaining
/// budget joins the open chunk; one that does not starts a new chunk. A
/// paragraph larger than the whole budget is split into greedy sentence
/// groups, each emitted as its own single-paragraph chunk, except the final
/// group, which seeds the next chunk so a following small paragraph can ride
/// along with it.
///
/// The only way a chunk exceeds `max_words` is a single sentence that is
/// itself over budget; such a sentence is never cut.
pub fn split(paragraphs: &[Paragraph], max_words: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut open: Vec<Paragraph> = Vec::new();
    let mut open_words = 0usize;
    let mut open_start = 0usize;

    for para in paragraphs {
        let words = count_words(&para.text);

        if words > max_words {
            flush(&mut chunks, &mut open, &mut open_words, open_start);
            if let Some((text, tail_words)) = split_oversized(para, max_words, &mut chunks) {
                open_start = para.index;
                open.push(Paragraph::new(text, para.style.clone(), para.index));
                open_words = tail_words;
            }
            continue;
        }

        if open_words + words > max_words && !open.is_empty() {
            flush(&mut chunks, &mut open, &mut open_words, open_start);
        }
        if open.is_empty() {
            open_start = para.index;
        }
        open.push(para.clone());
        open_words += words;
    }

    flush(&mut chunks, &mut open, &mut open_words, open_start);
    chunks
}

/// Emit the open chunk, if any, and reset the accumulator.
fn flush(chunks: &mut Vec<Chunk>, open: &mut Vec<Paragraph>, open_words: &mut usize, open_start: usize) {
    if open.is_empty() {
        return;
    }
    chunks.push(Chunk {
        paragraphs: std::mem::take(open),
        start_index: open_start,
        word_count: *open_words,
    });
    *open_words = 0;
}

/// Split an over-budget paragraph into greedy sentence groups. Every full
/// group becomes a single-paragraph chunk on the spot; the final group is
/// returned (joined text plus word count) to seed the caller's accumulator
/// rather than emitted.
fn split_oversized(
    para: &Paragraph,
    max_words: usize,
    chunks: &mut Vec<Chunk>,
) -> Option<(String, usize)> {
    let mut group: Vec<&str> = Vec::new();
    let mut group_words = 0usize;

    for sentence in split_sentences(&para.text) {
        let words = count_words(sentence);
        if group_words + words > max_words && !group.is_empty() {
            chunks.push(Chunk {
                paragraphs: vec![Paragraph::new(group.join(" "), para.style.clone(), para.index)],
                start_index: para.index,
                word_count: group_words,
            });
            group.clear();
            group_words = 0;
        }
        group.push(sentence);
        group_words += words;
    }

    if group.is_empty() {
        None
    } else {
        Some((group.join(" "), group_words))
    }
}

/// Split text into sentences on terminal punctuation. Each sentence keeps its
/// punctuation; the separating whitespace is dropped. Text with no boundary
/// comes back as a single sentence.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut last = 0;
    for boundary in SENTENCE_BOUNDARY.find_iter(text) {
        let sentence = text[last..boundary.end()].trim_end();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        last = boundary.end();
    }
    if last < text.len() {
        let tail = text[last..].trim_end();
        if !tail.is_empty() {
            sentences.push(tail);
        }
    }
    if sentences.is_empty() && !text.trim().is_empty() {
        sentences.push(text);
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(text: &str, style: &str, index: usize) -> Paragraph {
        Paragraph::new(text, style, index)
    }

    /// A sentence of exactly `words` distinct words ending in a period.
    fn long_sentence(tag: usize, words: usize) -> String {
        let mut s = (0..words)
            .map(|w| format!("s{}w{}", tag, w))
            .collect::<Vec<_>>()
            .join(" ");
        s.push('.');
        s
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("Hello world."), 2);
        assert_eq!(count_words("  spaced\t out \n words  "), 3);
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   "), 0);
    }

    #[test]
    fn test_single_small_paragraph() {
        let chunks = split(&[para("Hello world.", "Normal", 0)], 10);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].paragraphs.len(), 1);
        assert_eq!(chunks[0].word_count, 2);
        assert_eq!(chunks[0].start_index, 0);
        assert_eq!(chunks[0].flattened_text(), "Hello world.");
    }

    #[test]
    fn test_empty_input() {
        assert!(split(&[], 100).is_empty());
    }

    #[test]
    fn test_budget_overflow_starts_new_chunk() {
        let paragraphs = vec![para("A.", "Heading1", 0), para("B.", "Normal", 1)];
        let chunks = split(&paragraphs, 1);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].paragraphs[0].text, "A.");
        assert_eq!(chunks[0].paragraphs[0].style, "Heading1");
        assert_eq!(chunks[1].paragraphs[0].text, "B.");
        assert_eq!(chunks[1].start_index, 1);
    }

    #[test]
    fn test_exact_budget_fits() {
        // 5 + 5 = 10 words is within a 10-word budget; only 11 would split.
        let p1 = para("one two three four five.", "Normal", 0);
        let p2 = para("six seven eight nine ten.", "Normal", 1);
        let chunks = split(&[p1, p2], 10);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].paragraphs.len(), 2);
        assert_eq!(chunks[0].word_count, 10);
    }

    #[test]
    fn test_word_count_is_sum_of_paragraphs() {
        let paragraphs = vec![
            para("alpha beta gamma.", "Normal", 0),
            para("delta epsilon.", "Normal", 1),
        ];
        let chunks = split(&paragraphs, 50);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].word_count, 5);
        assert_eq!(count_words(&chunks[0].flattened_text()), 5);
    }

    #[test]
    fn test_oversized_paragraph_splits_into_sentence_groups() {
        // One paragraph of ten 600-word sentences against a 3500-word budget.
        // Greedy grouping packs five sentences (3000 words) per group.
        let sentences: Vec<String> = (0..10).map(|i| long_sentence(i, 600)).collect();
        let text = sentences.join(" ");
        let chunks = split(&[para(&text, "Normal", 0)], 3500);

        assert_eq!(chunks.len(), 2);
        for chunk in &chunks {
            assert_eq!(chunk.paragraphs.len(), 1);
            assert_eq!(chunk.start_index, 0);
            assert_eq!(chunk.word_count, 3000);
            assert!(chunk.word_count <= 3500);
        }
        let rejoined = chunks
            .iter()
            .map(|c| c.paragraphs[0].text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(rejoined, text);
    }

    #[test]
    fn test_final_sentence_group_seeds_next_chunk() {
        // Three 4-word sentences against a budget of 8: the first two fill a
        // chunk, the third is held open and picks up the next paragraph.
        let text = format!(
            "{} {} {}",
            long_sentence(0, 4),
            long_sentence(1, 4),
            long_sentence(2, 4)
        );
        let paragraphs = vec![para(&text, "Normal", 0), para("tiny tail.", "Normal", 1)];
        let chunks = split(&paragraphs, 8);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].paragraphs.len(), 1);
        assert_eq!(chunks[0].word_count, 8);
        // The held-open group and the following paragraph share a chunk.
        assert_eq!(chunks[1].paragraphs.len(), 2);
        assert_eq!(chunks[1].paragraphs[0].text, long_sentence(2, 4));
        assert_eq!(chunks[1].paragraphs[1].text, "tiny tail.");
        assert_eq!(chunks[1].start_index, 0);
        assert_eq!(chunks[1].word_count, 6);
    }

    #[test]
    fn test_giant_sentence_kept_whole() {
        // A single sentence over the whole budget is never cut; it is the one
        // permitted way for a chunk to exceed max_words.
        let giant = long_sentence(0, 12);
        let paragraphs = vec![para(&giant, "Normal", 0), para("after words.", "Normal", 1)];
        let chunks = split(&paragraphs, 5);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].word_count, 12);
        assert_eq!(chunks[0].paragraphs[0].text, giant);
        assert_eq!(chunks[1].paragraphs[0].text, "after words.");
    }

    #[test]
    fn test_unpunctuated_oversized_paragraph_kept_whole() {
        let text = "no punctuation here just six words";
        let chunks = split(&[para(text, "Normal", 0)], 3);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].paragraphs[0].text, text);
        assert_eq!(chunks[0].word_count, 6);
    }

    #[test]
    fn test_paragraphs_never_interleave() {
        let paragraphs: Vec<Paragraph> = (0..20)
            .map(|i| para(&format!("Paragraph number {} stands here.", i), "Normal", i))
            .collect();
        let chunks = split(&paragraphs, 9);

        let visited: Vec<usize> = chunks
            .iter()
            .flat_map(|c| c.paragraphs.iter().map(|p| p.index))
            .collect();
        assert_eq!(visited, (0..20).collect::<Vec<_>>());
        for chunk in &chunks {
            assert_eq!(chunk.start_index, chunk.paragraphs[0].index);
        }
    }

    #[test]
    fn test_split_sentences_keeps_punctuation() {
        let sentences = split_sentences("One. Two!  Three? Four");
        assert_eq!(sentences, vec!["One.", "Two!", "Three?", "Four"]);
    }

    #[test]
    fn test_split_sentences_no_boundary() {
        let sentences = split_sentences("no terminal punctuation at all");
        assert_eq!(sentences, vec!["no terminal punctuation at all"]);
    }

    #[test]
    fn test_split_sentences_ellipsis_collapses() {
        // A punctuation run counts as one boundary.
        let sentences = split_sentences("Wait... Done.");
        assert_eq!(sentences, vec!["Wait...", "Done."]);
    }
}
