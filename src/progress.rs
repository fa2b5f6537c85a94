//! Build progress reporting.
//!
//! `dlib build` is slow by design (one throttled lookup per file), so it
//! reports where it is. Progress goes to **stderr** so stdout stays clean for
//! the summary.

use std::io::Write;

/// A single progress event for a catalog build.
#[derive(Clone, Debug)]
pub enum BuildProgressEvent {
    /// Walking the contents root. Total unknown.
    Discovering { root: String },
    /// Looking up the title for file `n` of `total`.
    Resolving {
        n: u64,
        total: u64,
        canonical_id: String,
    },
}

/// Receives progress events from the builder.
pub trait BuildProgressReporter: Send + Sync {
    fn report(&self, event: BuildProgressEvent);
}

/// Human-friendly progress on stderr: "build  resolving  12 / 1,034  abc123".
pub struct StderrProgress;

impl BuildProgressReporter for StderrProgress {
    fn report(&self, event: BuildProgressEvent) {
        let line = match &event {
            BuildProgressEvent::Discovering { root } => {
                format!("build  discovering {}...\n", root)
            }
            BuildProgressEvent::Resolving {
                n,
                total,
                canonical_id,
            } => format!(
                "build  resolving  {} / {}  {}\n",
                format_number(*n),
                format_number(*total),
                canonical_id
            ),
        };
        let mut stderr = std::io::stderr().lock();
        let _ = stderr.write_all(line.as_bytes());
        let _ = stderr.flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl BuildProgressReporter for JsonProgress {
    fn report(&self, event: BuildProgressEvent) {
        let obj = match &event {
            BuildProgressEvent::Discovering { root } => serde_json::json!({
                "event": "progress",
                "phase": "discovering",
                "root": root
            }),
            BuildProgressEvent::Resolving {
                n,
                total,
                canonical_id,
            } => serde_json::json!({
                "event": "progress",
                "phase": "resolving",
                "n": n,
                "total": total,
                "canonical_id": canonical_id
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr, "{}", line);
            let _ = stderr.flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl BuildProgressReporter for NoProgress {
    fn report(&self, _event: BuildProgressEvent) {}
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
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    pub fn reporter(&self) -> Box<dyn BuildProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
