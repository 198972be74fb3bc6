//! Translation progress reporting.
//!
//! Reports observable progress during `docglot translate` so users watching a
//! long document know extraction finished and how many chunks have come back.
//! Progress is emitted on **stderr** so stdout remains parseable for scripts.

use std::io::Write;

/// A single progress event for a translation run.
#[derive(Clone, Debug)]
pub enum TranslateProgressEvent {
    /// Reading and extracting the input document (chunk total unknown yet).
    Extracting { file: String },
    /// Translation phase: n chunks finished out of total.
    Translating { n: u64, total: u64 },
}

/// Reports translation progress. Implementations write to stderr (human or
/// JSON).
pub trait ProgressReporter: Send + Sync {
    /// Emit a progress event. Called from the pipeline.
    fn report(&self, event: TranslateProgressEvent);
}

/// Human-friendly progress on stderr: "translate report.docx  3 / 12 chunks".
pub struct StderrProgress;

impl ProgressReporter for StderrProgress {
    fn report(&self, event: TranslateProgressEvent) {
        let line = match &event {
            TranslateProgressEvent::Extracting { file } => {
                format!("translate {}  extracting...\n", file)
            }
            TranslateProgressEvent::Translating { n, total } => {
                format!(
                    "translate  {} / {} chunks\n",
                    format_number(*n),
                    format_number(*total)
                )
            }
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl ProgressReporter for JsonProgress {
    fn report(&self, event: TranslateProgressEvent) {
        let obj = match &event {
            TranslateProgressEvent::Extracting { file } => serde_json::json!({
                "event": "progress",
                "phase": "extracting",
                "file": file
            }),
            TranslateProgressEvent::Translating { n, total } => serde_json::json!({
                "event": "progress",
                "phase": "translating",
                "n": n,
                "total": total
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _event: TranslateProgressEvent) {}
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    let chars: Vec<char> = s.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    /// Parse the `--progress` flag value.
    pub fn parse(value: &str) -> anyhow::Result<Self> {
        match value {
            "auto" => Ok(Self::default_for_tty()),
            "human" => Ok(ProgressMode::Human),
            "json" => Ok(ProgressMode::Json),
            "off" => Ok(ProgressMode::Off),
            other => anyhow::bail!(
                "Invalid progress mode '{}'. Must be auto, human, json, or off.",
                other
            ),
        }
    }

    /// Build a reporter for this mode. Caller passes it to the pipeline.
    pub fn reporter(&self) -> Box<dyn ProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
