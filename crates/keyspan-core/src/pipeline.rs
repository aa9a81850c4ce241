//! Report pipeline: read the raw text, extract, analyze, write both artifacts.
//!
//! Both artifacts are serialized in memory and staged next to their targets
//! before either target is touched, so a failing run leaves no partial output.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregator::{analyze_with, Analysis};
use crate::config::{
    ReportConfig, DEFAULT_INPUT_PATH, DEFAULT_RECORDS_PATH, DEFAULT_SUMMARY_PATH,
};
use crate::errors::{KeyspanError, KeyspanResult};
use crate::extractor::{extract_entries, EntryOutcome};
use crate::models::{PuzzleRecord, SummaryReport};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportPaths {
    pub input: PathBuf,
    pub records_out: PathBuf,
    pub summary_out: PathBuf,
}

impl Default for ReportPaths {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT_PATH),
            records_out: PathBuf::from(DEFAULT_RECORDS_PATH),
            summary_out: PathBuf::from(DEFAULT_SUMMARY_PATH),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReportOutcome {
    pub analysis: Analysis,
    pub extracted: usize,
    pub skipped: usize,
    pub elapsed_ms: i64,
}

/// Read the report text; a missing file is `InputNotFound`.
pub fn read_report(path: &Path) -> KeyspanResult<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => KeyspanError::InputNotFound(path.to_path_buf()),
        _ => KeyspanError::Io(e),
    })
}

/// Pretty JSON (two-space indent) with object keys in sorted order.
pub fn to_sorted_json<T: Serialize + ?Sized>(value: &T) -> KeyspanResult<String> {
    let tree = serde_json::to_value(value)?;
    Ok(serde_json::to_string_pretty(&tree)?)
}

pub fn records_json(records: &[PuzzleRecord]) -> KeyspanResult<String> {
    let entries: Vec<_> = records.iter().map(PuzzleRecord::entry).collect();
    to_sorted_json(&entries)
}

pub fn summary_json(summary: &SummaryReport) -> KeyspanResult<String> {
    to_sorted_json(summary)
}

/// Extract records from `text`, logging every skipped chunk.
pub fn extract_logged(text: &str) -> (Vec<PuzzleRecord>, usize) {
    let mut records = Vec::new();
    let mut skipped = 0;
    for outcome in extract_entries(text) {
        match outcome {
            EntryOutcome::Matched(record) => records.push(record),
            EntryOutcome::Skipped { raw, reason } => {
                skipped += 1;
                let preview: String = raw.chars().take(60).collect();
                debug!(%reason, entry = %preview, "Skipped report entry");
            }
        }
    }
    if skipped > 0 {
        warn!(
            skipped,
            extracted = records.len(),
            "Some report entries were not recognised"
        );
    }
    (records, skipped)
}

/// Run the whole report: read, extract, analyze, then write both artifacts.
///
/// Fails with `NoRecords` (writing nothing) when no entry could be extracted.
pub fn run_report(paths: &ReportPaths, config: &ReportConfig) -> KeyspanResult<ReportOutcome> {
    let started = Instant::now();
    info!(input = %paths.input.display(), "Reading puzzle report");
    let text = read_report(&paths.input)?;

    let (records, skipped) = extract_logged(&text);
    if records.is_empty() {
        return Err(KeyspanError::NoRecords);
    }

    let records_payload = records_json(&records)?;
    let analysis = analyze_with(&records, config.top_n);
    let summary_payload = summary_json(&analysis.summary)?;

    write_all(&[
        (paths.records_out.as_path(), records_payload.as_str()),
        (paths.summary_out.as_path(), summary_payload.as_str()),
    ])?;

    let elapsed_ms = started.elapsed().as_millis() as i64;
    info!(
        records = records.len(),
        skipped,
        elapsed_ms,
        records_out = %paths.records_out.display(),
        summary_out = %paths.summary_out.display(),
        "Report written"
    );

    Ok(ReportOutcome {
        extracted: records.len(),
        analysis,
        skipped,
        elapsed_ms,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn staging_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    target.with_file_name(name)
}

/// Stage every payload, then move them into place.
///
/// A staging failure removes what was staged and leaves the targets
/// untouched. A failed move also removes the targets already moved by this
/// call, so either every output is written or none is.
fn write_all(outputs: &[(&Path, &str)]) -> KeyspanResult<()> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(outputs.len());
    for &(target, payload) in outputs {
        let staging = staging_path(target);
        if let Err(e) = fs::write(&staging, payload) {
            let _ = fs::remove_file(&staging);
            for (path, _) in &staged {
                let _ = fs::remove_file(path);
            }
            return Err(e.into());
        }
        staged.push((staging, target));
    }
    for (i, (staging, target)) in staged.iter().enumerate() {
        if let Err(e) = fs::rename(staging, target) {
            for (_, placed) in &staged[..i] {
                let _ = fs::remove_file(placed);
            }
            for (pending, _) in &staged[i..] {
                let _ = fs::remove_file(pending);
            }
            return Err(e.into());
        }
    }
    Ok(())
}
