//! Folds extracted records into per-record metrics and a summary report.

use indexmap::IndexMap;
use num_bigint::BigInt;

use crate::config::DEFAULT_TOP_N;
use crate::models::{
    DerivedMetrics, EnrichedRecord, PositionDelta, PositionStats, PuzzleRecord, SolverCount,
    SummaryReport,
};

/// Records in canonical (date-sorted) order with their metrics, plus the
/// summary folded from them.
#[derive(Clone, Debug, PartialEq)]
pub struct Analysis {
    pub records: Vec<EnrichedRecord>,
    pub summary: SummaryReport,
}

pub fn derive_metrics(record: &PuzzleRecord) -> DerivedMetrics {
    let start = BigInt::from(record.range.start().clone());
    let end = BigInt::from(record.range.end().clone());
    let key = BigInt::from(record.key.clone());
    DerivedMetrics {
        size: record.range.size(),
        computed_position_percent: record.range.position_of(&record.key),
        distance_from_start: &key - start,
        distance_from_end: end - key,
    }
}

/// Rank actors by count, descending, keeping at most `top_n`.
///
/// The sort is stable, so actors with equal counts keep the order in which
/// `counts` first saw them.
pub fn leaderboard(counts: &IndexMap<String, usize>, top_n: usize) -> Vec<SolverCount> {
    let mut ranked: Vec<SolverCount> = counts
        .iter()
        .map(|(actor, &count)| SolverCount {
            actor: actor.clone(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(top_n);
    ranked
}

pub fn position_deltas(records: &[EnrichedRecord]) -> Vec<PositionDelta> {
    records
        .windows(2)
        .map(|pair| PositionDelta {
            from_index: pair[0].record.index,
            to_index: pair[1].record.index,
            delta: pair[1].metrics.computed_position_percent
                - pair[0].metrics.computed_position_percent,
        })
        .collect()
}

/// [`analyze_with`] using the default leaderboard size.
pub fn analyze(records: &[PuzzleRecord]) -> Analysis {
    analyze_with(records, DEFAULT_TOP_N)
}

/// Enrich and summarise `records`.
///
/// Never fails: an empty input yields [`SummaryReport::empty`].
pub fn analyze_with(records: &[PuzzleRecord], top_n: usize) -> Analysis {
    if records.is_empty() {
        return Analysis {
            records: Vec::new(),
            summary: SummaryReport::empty(),
        };
    }

    let mut sorted: Vec<&PuzzleRecord> = records.iter().collect();
    sorted.sort_by_key(|record| record.event_date);

    let mut solver_counts: IndexMap<String, usize> = IndexMap::new();
    let mut stats = PositionStats {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
        average: 0.0,
        total: 0.0,
        count: sorted.len(),
    };
    let mut enriched = Vec::with_capacity(sorted.len());

    for record in sorted {
        *solver_counts.entry(record.actor.clone()).or_insert(0) += 1;

        let metrics = derive_metrics(record);
        let position = metrics.computed_position_percent;
        stats.min = stats.min.min(position);
        stats.max = stats.max.max(position);
        stats.total += position;

        enriched.push(EnrichedRecord {
            record: record.clone(),
            metrics,
        });
    }
    stats.average = stats.total / stats.count as f64;

    let summary = SummaryReport {
        error: None,
        total_puzzles: enriched.len(),
        unique_solvers: solver_counts.len(),
        top_solvers: leaderboard(&solver_counts, top_n),
        position_stats: stats,
        first_solve: enriched.first().map(|e| e.record.event_date),
        last_solve: enriched.last().map(|e| e.record.event_date),
        solver_stats: solver_counts
            .iter()
            .map(|(actor, &count)| SolverCount {
                actor: actor.clone(),
                count,
            })
            .collect(),
        range_patterns: enriched.iter().map(EnrichedRecord::pattern).collect(),
        position_deltas: position_deltas(&enriched),
    };

    Analysis {
        records: enriched,
        summary,
    }
}
