//! Append-only JSONL journal of pick decisions, one line per dispatched event.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uipick_common::error::{UiPickError, UiPickResult};
use uipick_ui_model::{PointerEvent, PointerPhase, TimestampMs};

use crate::outcome::{Dispatch, ResolutionOutcome};
use crate::picker::PickerKind;

pub const JOURNAL_SCHEMA_VERSION: &str = "1.0";

/// First line of a journal, written as a `#` comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalHeader {
    pub schema_version: String,
    pub started_at: DateTime<Utc>,
    /// Where the events came from (a fixture path, "live", ...).
    pub source: String,
}

impl JournalHeader {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            schema_version: JOURNAL_SCHEMA_VERSION.to_string(),
            started_at: Utc::now(),
            source: source.into(),
        }
    }
}

/// One decision line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionRecord {
    pub t: TimestampMs,
    pub phase: PointerPhase,
    pub outcome: ResolutionOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<PickerKind>,
    pub suppressed: bool,
}

impl DecisionRecord {
    pub fn from_dispatch(
        event: &PointerEvent,
        dispatch: &Dispatch,
        kind: Option<PickerKind>,
    ) -> Self {
        Self {
            t: event.timestamp_ms,
            phase: event.phase,
            outcome: dispatch.outcome,
            root_id: dispatch.root_id.clone(),
            kind,
            suppressed: dispatch.is_suppressed(),
        }
    }
}

/// Writes decision records to a JSONL file.
pub struct DecisionJournal {
    writer: BufWriter<File>,
    path: PathBuf,
    records_written: u64,
}

impl DecisionJournal {
    /// Create (truncating) a journal at `path`, header first.
    pub fn create(path: impl AsRef<Path>, header: &JournalHeader) -> UiPickResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        let mut writer = BufWriter::new(file);

        let header_json = serde_json::to_string(header)?;
        writeln!(writer, "# {header_json}")
            .map_err(|e| UiPickError::capture(format!("Failed to write journal header: {e}")))?;

        Ok(Self {
            writer,
            path,
            records_written: 0,
        })
    }

    pub fn write_record(&mut self, record: &DecisionRecord) -> UiPickResult<()> {
        let json = serde_json::to_string(record)?;
        writeln!(self.writer, "{json}")
            .map_err(|e| UiPickError::capture(format!("Failed to write decision: {e}")))?;
        self.records_written += 1;

        if self.records_written % 256 == 0 {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> UiPickResult<()> {
        self.writer
            .flush()
            .map_err(|e| UiPickError::capture(format!("Failed to flush journal: {e}")))
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DecisionJournal {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
