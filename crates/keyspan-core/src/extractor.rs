//! Tolerant extraction of solved-puzzle entries from free-form report text.
//!
//! A report is a blob of human-authored text in which each entry starts on a
//! line of the form `<index> <start-hex>:<end-hex> ...`. The blob is split at
//! those lines and each chunk is matched by a single declarative pattern.
//! Chunks that do not yield a record are reported as [`EntryOutcome::Skipped`]
//! rather than raised; what to do with them is up to the caller.
//!
//! Extraction is pure: no I/O, no logging, no shared state.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};

use crate::errors::KeyspanError;
use crate::interval::{hex_to_int, Interval};
use crate::models::PuzzleRecord;

// ---------------------------------------------------------------------------
// Compiled regex patterns (LazyLock for one-time init)
// ---------------------------------------------------------------------------

static ENTRY_BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)^[0-9]+\s+[0-9a-f]+:[0-9a-f]+\s").unwrap());

static ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?isx)
        ([0-9]+)\s+                      # index
        ([0-9a-f]+):([0-9a-f]+)\s+       # range start:end
        ([0-9a-f]{2,}|[0-9abdef])\s+     # key; a lone `c` is the compression column
        (?:c\s+)?                        # optional compression column
        ([0-9a-z]+)\s+                   # label
        .*?                              # free text
        SOLVED\s*
        ([0-9.]+)%\s+                    # claimed position
        ([0-9]{4}-[0-9]{2}-[0-9]{2})\s+  # date
        by\s+
        ([0-9a-z]+)                      # actor
        ",
    )
    .unwrap()
});

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Why a candidate chunk produced no record.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SkipReason {
    #[error("entry does not match the expected layout")]
    NoMatch,
    #[error("index {0:?} is not a valid integer")]
    InvalidIndex(String),
    #[error("position {0:?} is not a valid number")]
    InvalidPosition(String),
    #[error("date {0:?} is not a calendar date")]
    InvalidDate(String),
    #[error("{0}")]
    InvalidRange(String),
}

/// Result of matching one candidate chunk.
#[derive(Clone, Debug, PartialEq)]
pub enum EntryOutcome {
    Matched(PuzzleRecord),
    Skipped { raw: String, reason: SkipReason },
}

impl EntryOutcome {
    pub fn record(&self) -> Option<&PuzzleRecord> {
        match self {
            EntryOutcome::Matched(record) => Some(record),
            EntryOutcome::Skipped { .. } => None,
        }
    }

    pub fn into_record(self) -> Option<PuzzleRecord> {
        match self {
            EntryOutcome::Matched(record) => Some(record),
            EntryOutcome::Skipped { .. } => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, EntryOutcome::Skipped { .. })
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Split `text` into candidate entry chunks, in blob order.
///
/// A new chunk begins at every line that looks like an entry header; any text
/// before the first header forms a chunk of its own. Blank chunks are dropped.
pub fn split_entries(text: &str) -> Vec<&str> {
    let text = text.trim();
    let mut chunks = Vec::new();
    let mut chunk_start = 0;
    for header in ENTRY_BOUNDARY_RE.find_iter(text) {
        if header.start() > chunk_start {
            chunks.push(&text[chunk_start..header.start()]);
        }
        chunk_start = header.start();
    }
    chunks.push(&text[chunk_start..]);

    chunks
        .into_iter()
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect()
}

/// Match a single chunk.
pub fn parse_entry(chunk: &str) -> EntryOutcome {
    let outcome = ENTRY_RE
        .captures(chunk)
        .ok_or(SkipReason::NoMatch)
        .and_then(|caps| build_record(&caps));
    match outcome {
        Ok(record) => EntryOutcome::Matched(record),
        Err(reason) => EntryOutcome::Skipped {
            raw: chunk.to_string(),
            reason,
        },
    }
}

/// Every candidate chunk of `text` with its outcome, in blob order.
pub fn extract_entries(text: &str) -> Vec<EntryOutcome> {
    split_entries(text).into_iter().map(parse_entry).collect()
}

/// The successfully extracted records of `text`, in blob order.
pub fn extract_records(text: &str) -> Vec<PuzzleRecord> {
    extract_entries(text)
        .into_iter()
        .filter_map(EntryOutcome::into_record)
        .collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build_record(caps: &Captures<'_>) -> Result<PuzzleRecord, SkipReason> {
    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());

    let index = group(1)
        .parse::<u64>()
        .map_err(|_| SkipReason::InvalidIndex(group(1).to_string()))?;

    let range = Interval::from_hex(group(2), group(3)).map_err(to_skip_reason)?;
    let key = hex_to_int(group(4)).map_err(to_skip_reason)?;

    let claimed_position_percent = group(6)
        .parse::<f64>()
        .map_err(|_| SkipReason::InvalidPosition(group(6).to_string()))?;

    let event_date = NaiveDate::parse_from_str(group(7), "%Y-%m-%d")
        .map_err(|_| SkipReason::InvalidDate(group(7).to_string()))?;

    Ok(PuzzleRecord {
        index,
        range,
        range_start_hex: group(2).to_string(),
        range_end_hex: group(3).to_string(),
        key,
        key_hex: group(4).to_string(),
        label: group(5).to_string(),
        claimed_position_percent,
        event_date,
        actor: group(8).to_string(),
    })
}

fn to_skip_reason(err: KeyspanError) -> SkipReason {
    SkipReason::InvalidRange(err.to_string())
}
