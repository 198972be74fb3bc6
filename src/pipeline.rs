//! Translation pipeline orchestration.
//!
//! Coordinates the full flow: extraction, chunking, concurrent translation,
//! reassembly, docx output. Chunks are translated in concurrency-sized
//! batches with their outputs kept in chunk order; a chunk whose retries are
//! exhausted aborts the run before anything is written.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use futures::future;

use crate::chunk;
use crate::config::Config;
use crate::extract;
use crate::models::{Chunk, TranslatedChunk};
use crate::progress::{ProgressReporter, TranslateProgressEvent};
use crate::reassemble;
use crate::translate::{TranslateError, Translator};
use crate::writer;

/// One translation run, as resolved from CLI flags and config defaults.
#[derive(Debug, Clone)]
pub struct TranslateJob {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub target_language: String,
    pub source_language: Option<String>,
    pub hints: Option<String>,
    pub dry_run: bool,
}

pub async fn run_translate(
    config: &Config,
    job: &TranslateJob,
    reporter: &dyn ProgressReporter,
) -> Result<()> {
    reporter.report(TranslateProgressEvent::Extracting {
        file: job.input.display().to_string(),
    });
    let (paragraphs, report) = extract::extract_document(&job.input)?;

    if let Some(report) = &report {
        if report.likely_scanned {
            eprintln!(
                "warning: this PDF looks scanned (image-based); little or no text could be extracted"
            );
        }
        if report.likely_multi_column {
            eprintln!(
                "warning: this PDF looks multi-column; extracted paragraph order may not match reading order"
            );
        }
    }

    if paragraphs.is_empty() {
        eprintln!(
            "warning: no translatable text found in {}; nothing to do",
            job.input.display()
        );
        return Ok(());
    }

    let chunks = chunk::split(&paragraphs, config.chunking.max_words);

    if job.dry_run {
        println!("translate {} (dry-run)", job.input.display());
        if let Some(report) = &report {
            println!("  pages: {}", report.page_count);
        }
        println!("  paragraphs: {}", paragraphs.len());
        println!("  chunks: {}", chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            println!(
                "  chunk {}: {} paragraphs, {} words",
                i + 1,
                chunk.paragraphs.len(),
                chunk.word_count
            );
        }
        return Ok(());
    }

    let translator = Translator::new(&config.translation)?;
    let translated = translate_chunks(&translator, &chunks, config, job, reporter).await?;

    let output_paragraphs = reassemble::reassemble(&translated);
    let out_path = job
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&job.input));
    writer::write_docx(&out_path, &output_paragraphs)?;

    println!("translate {}", job.input.display());
    if let Some(report) = &report {
        println!("  pages: {}", report.page_count);
    }
    println!("  paragraphs: {}", paragraphs.len());
    println!("  chunks: {}", chunks.len());
    println!("  translated paragraphs: {}", output_paragraphs.len());
    println!("  output: {}", out_path.display());
    println!("ok");
    Ok(())
}

/// Translate all chunks in concurrency-sized batches, yielding results in
/// chunk order. A failed chunk aborts the run once its batch settles.
async fn translate_chunks(
    translator: &Translator,
    chunks: &[Chunk],
    config: &Config,
    job: &TranslateJob,
    reporter: &dyn ProgressReporter,
) -> Result<Vec<TranslatedChunk>> {
    let total = chunks.len() as u64;
    reporter.report(TranslateProgressEvent::Translating { n: 0, total });

    let max_retries = config.translation.max_retries;
    let batch_size = config.translation.concurrency.max(1);

    let mut results = Vec::with_capacity(chunks.len());
    let mut done = 0u64;
    for batch in chunks.chunks(batch_size) {
        let batch_futures: Vec<_> = batch
            .iter()
            .map(|chunk| async move {
                translate_with_retry(translator, chunk, job, max_retries)
                    .await
                    .map(|text| TranslatedChunk {
                        text,
                        source: chunk.clone(),
                    })
            })
            .collect();

        for (chunk, result) in batch.iter().zip(future::join_all(batch_futures).await) {
            let translated = result.with_context(|| {
                format!("translating chunk starting at paragraph {}", chunk.start_index)
            })?;
            results.push(translated);
            done += 1;
            reporter.report(TranslateProgressEvent::Translating { n: done, total });
        }
    }
    Ok(results)
}

/// Call the translator with exponential backoff for transient failures.
/// Non-retryable errors abort immediately.
async fn translate_with_retry(
    translator: &Translator,
    chunk: &Chunk,
    job: &TranslateJob,
    max_retries: u32,
) -> Result<String, TranslateError> {
    let text = chunk.flattened_text();
    let mut last_err = None;

    for attempt in 0..=max_retries {
        if attempt > 0 {
            // Exponential backoff: 1s, 2s, 4s, 8s, ...
            let delay = Duration::from_secs(1 << (attempt - 1).min(5));
            tokio::time::sleep(delay).await;
        }

        match translator
            .translate(
                &text,
                Some(job.target_language.as_str()),
                job.source_language.as_deref(),
                job.hints.as_deref(),
            )
            .await
        {
            Ok(translated) => return Ok(translated),
            Err(e) if e.is_retryable() => last_err = Some(e),
            Err(e) => return Err(e),
        }
    }

    Err(last_err
        .unwrap_or_else(|| TranslateError::Network("translation failed after retries".to_string())))
}

/// `translated_<stem>.docx` next to the input file.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    input.with_file_name(format!("translated_{}.docx", stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path_next_to_input() {
        let out = default_output_path(Path::new("reports/q3.pdf"));
        assert_eq!(out, Path::new("reports/translated_q3.docx"));
    }

    #[test]
    fn test_default_output_path_without_extension() {
        let out = default_output_path(Path::new("notes"));
        assert_eq!(out, Path::new("translated_notes.docx"));
    }
}
