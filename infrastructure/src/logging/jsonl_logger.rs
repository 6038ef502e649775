//! JSONL transcript writer for discussion events.
//!
//! Each [`ConversationEvent`] becomes one JSON line carrying `type`, `seq`
//! and an RFC 3339 `timestamp` next to the event payload.

use roundtable_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

struct Inner {
    writer: BufWriter<File>,
    seq: u64,
}

/// Transcript logger that writes one JSON object per line.
///
/// Thread-safe via a `Mutex`. Every line is flushed as it is written so an
/// interrupted run still leaves a readable transcript.
pub struct JsonlConversationLogger {
    inner: Mutex<Inner>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Create a logger that truncates `path`.
    ///
    /// Parent directories are created as needed. Returns `None` (after a
    /// warning) if the file cannot be opened; the caller then runs without
    /// a transcript.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        Self::open(path.as_ref(), false)
    }

    /// Create a logger that appends to `path`.
    pub fn append(path: impl AsRef<Path>) -> Option<Self> {
        Self::open(path.as_ref(), true)
    }

    fn open(path: &Path, append: bool) -> Option<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty())
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create transcript directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path);
        let file = match file {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open transcript file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            inner: Mutex::new(Inner {
                writer: BufWriter::new(file),
                seq: 0,
            }),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn build_record(event: ConversationEvent, seq: u64, timestamp: String) -> Value {
    let mut map = match event.payload {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    map.insert("type".to_string(), Value::String(event.event_type.to_string()));
    map.insert("seq".to_string(), Value::from(seq));
    map.insert("timestamp".to_string(), Value::String(timestamp));
    Value::Object(map)
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let Ok(mut inner) = self.inner.lock() else {
            return;
        };
        inner.seq += 1;
        let record = build_record(event, inner.seq, timestamp);
        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };
        if writeln!(inner.writer, "{}", line)
            .and_then(|_| inner.writer.flush())
            .is_err()
        {
            warn!("Failed to write transcript line to {}", self.path.display());
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.lock() {
            let _ = inner.writer.flush();
        }
    }
}
