//! Shared typed models used across extraction, aggregation, and reporting.
//!
//! Big integers are serialized as decimal strings: JSON numbers beyond 2^53
//! lose precision in most consumers, and puzzle ranges go far beyond that.

use chrono::NaiveDate;
use num_bigint::{BigInt, BigUint};
use serde::Serialize;

use crate::interval::Interval;

/// Serde adapter writing any `Display` value (here: big integers) as a string.
pub(crate) mod decimal {
    use std::fmt::Display;

    use serde::Serializer;

    pub fn serialize<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }
}

// ---------------------------------------------------------------------------
// 1. PuzzleRecord
// ---------------------------------------------------------------------------

/// One solved-puzzle entry extracted from report text.
///
/// Records are never mutated after extraction. The hex spellings from the
/// source are kept next to the parsed values so output can echo them with
/// their source padding.
#[derive(Clone, Debug, PartialEq)]
pub struct PuzzleRecord {
    pub index: u64,
    pub range: Interval,
    pub range_start_hex: String,
    pub range_end_hex: String,
    pub key: BigUint,
    pub key_hex: String,
    pub label: String,
    /// Percentage stated in the source. Not reconciled with the computed one.
    pub claimed_position_percent: f64,
    pub event_date: NaiveDate,
    pub actor: String,
}

impl PuzzleRecord {
    pub fn entry(&self) -> RecordEntry<'_> {
        RecordEntry {
            actor: &self.actor,
            claimed_position_percent: self.claimed_position_percent,
            event_date: self.event_date,
            index: self.index,
            key: &self.key_hex,
            label: &self.label,
            range_end: &self.range_end_hex,
            range_start: &self.range_start_hex,
        }
    }
}

/// Serialized form of a [`PuzzleRecord`] in the cleaned records artifact.
#[derive(Debug, Serialize)]
pub struct RecordEntry<'a> {
    pub actor: &'a str,
    pub claimed_position_percent: f64,
    pub event_date: NaiveDate,
    pub index: u64,
    pub key: &'a str,
    pub label: &'a str,
    pub range_end: &'a str,
    pub range_start: &'a str,
}

// ---------------------------------------------------------------------------
// 2. DerivedMetrics / EnrichedRecord
// ---------------------------------------------------------------------------

/// Values computed from a record's range and key.
///
/// Distances are signed: a key outside its declared range is legal input,
/// and then one of them is negative.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivedMetrics {
    pub size: BigUint,
    pub computed_position_percent: f64,
    pub distance_from_start: BigInt,
    pub distance_from_end: BigInt,
}

/// A record paired with its derived metrics.
#[derive(Clone, Debug, PartialEq)]
pub struct EnrichedRecord {
    pub record: PuzzleRecord,
    pub metrics: DerivedMetrics,
}

impl EnrichedRecord {
    pub fn pattern(&self) -> RangePattern {
        RangePattern {
            index: self.record.index,
            range_start_hex: self.record.range_start_hex.clone(),
            range_end_hex: self.record.range_end_hex.clone(),
            range_start_decimal: self.record.range.start().clone(),
            range_end_decimal: self.record.range.end().clone(),
            range_size: self.metrics.size.clone(),
            key_decimal: self.record.key.clone(),
            position_in_range: self.metrics.computed_position_percent,
            distance_from_start: self.metrics.distance_from_start.clone(),
            distance_from_end: self.metrics.distance_from_end.clone(),
        }
    }
}

/// Per-record entry of the summary's `range_patterns` array.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RangePattern {
    pub index: u64,
    pub range_start_hex: String,
    pub range_end_hex: String,
    #[serde(serialize_with = "decimal::serialize")]
    pub range_start_decimal: BigUint,
    #[serde(serialize_with = "decimal::serialize")]
    pub range_end_decimal: BigUint,
    #[serde(serialize_with = "decimal::serialize")]
    pub range_size: BigUint,
    #[serde(serialize_with = "decimal::serialize")]
    pub key_decimal: BigUint,
    pub position_in_range: f64,
    #[serde(serialize_with = "decimal::serialize")]
    pub distance_from_start: BigInt,
    #[serde(serialize_with = "decimal::serialize")]
    pub distance_from_end: BigInt,
}

// ---------------------------------------------------------------------------
// 3. SummaryReport
// ---------------------------------------------------------------------------

/// Marker carried by the summary of an empty record set.
pub const EMPTY_REPORT_MARKER: &str = "No puzzle data found";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SolverCount {
    pub actor: String,
    pub count: usize,
}

/// Statistics over the computed (not the claimed) position percentages.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PositionStats {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub total: f64,
    pub count: usize,
}

/// Change in computed position between two consecutive records.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PositionDelta {
    pub from_index: u64,
    pub to_index: u64,
    pub delta: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SummaryReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub total_puzzles: usize,
    pub unique_solvers: usize,
    pub top_solvers: Vec<SolverCount>,
    pub position_stats: PositionStats,
    pub first_solve: Option<NaiveDate>,
    pub last_solve: Option<NaiveDate>,
    pub solver_stats: Vec<SolverCount>,
    pub range_patterns: Vec<RangePattern>,
    pub position_deltas: Vec<PositionDelta>,
}

impl SummaryReport {
    /// The report for a record set with no entries.
    pub fn empty() -> Self {
        Self {
            error: Some(EMPTY_REPORT_MARKER.to_string()),
            total_puzzles: 0,
            unique_solvers: 0,
            top_solvers: Vec::new(),
            position_stats: PositionStats::default(),
            first_solve: None,
            last_solve: None,
            solver_stats: Vec::new(),
            range_patterns: Vec::new(),
            position_deltas: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_puzzles == 0
    }
}
