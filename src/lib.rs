//! # Docglot
//!
//! A document translation engine built on OpenAI chat models.
//!
//! Docglot extracts paragraph text from `.docx`, `.pdf`, and `.txt` files,
//! packs paragraphs into word-budgeted chunks, translates each chunk through
//! the chat completions API with bounded concurrency, and reassembles the
//! responses into a new `.docx` that preserves paragraph styles.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌──────────────┐
//! │   Extract    │──▶│    Chunk    │──▶│  Translate   │
//! │ docx/pdf/txt │   │ word budget │   │ OpenAI chat  │
//! └──────────────┘   └─────────────┘   └──────┬───────┘
//!                                             │
//!                        ┌────────────────────┤
//!                        ▼                    ▼
//!                  ┌──────────┐        ┌──────────┐
//!                  │Reassemble│───────▶│  Writer  │
//!                  │  styles  │        │  .docx   │
//!                  └──────────┘        └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export OPENAI_API_KEY=sk-...
//! docglot translate report.docx --to French
//! docglot translate notes.txt --to German --from English
//! docglot translate paper.pdf --to Spanish --dry-run
//! docglot languages
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`languages`] | Supported language catalog |
//! | [`extract`] | docx/pdf/txt paragraph extraction |
//! | [`chunk`] | Word-budget chunking |
//! | [`translate`] | OpenAI chat completions client |
//! | [`reassemble`] | Chunk output to paragraph mapping |
//! | [`writer`] | docx output |
//! | [`pipeline`] | End-to-end translation run |
//! | [`progress`] | Progress reporting |

pub mod chunk;
pub mod config;
pub mod extract;
pub mod languages;
pub mod models;
pub mod pipeline;
pub mod progress;
pub mod reassemble;
pub mod translate;
pub mod writer;
