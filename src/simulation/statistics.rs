//! Cross-run statistical aggregation.
//!
//! Reduces many sealed [`RunLedger`]s into per-node distributions and RTO/RPO
//! pass counts. Built by folding every ledger after all runs complete; never
//! incrementally during a run.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::graph::NodeId;
use crate::simulation::ledger::RunLedger;

/// Sentinel for "never compromised" in the first-day distribution.
pub const NEVER_COMPROMISED: i64 = -1;

/// Per-node results across all runs of a set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeStatistics {
    /// First day compromised per run; [`NEVER_COMPROMISED`] when clean.
    pub first_day_compromised: Vec<i64>,
    /// Total days compromised per run (the RTO quantity).
    pub total_days_compromised: Vec<u32>,
    /// Distinct compromise events per run (rising edges only).
    pub times_compromised: Vec<u32>,
    /// Cumulative data-loss days per run (the RPO quantity).
    pub days_data_lost: Vec<u32>,
    /// Runs with `total_days_compromised < rto` (strict).
    pub simulations_rto_passed: u32,
    /// Runs with `days_data_lost < rpo` (strict).
    pub simulations_rpo_passed: u32,
}

impl NodeStatistics {
    /// Fold one run's boolean day series into the distributions.
    pub fn record_run(&mut self, series: &[bool], rto: u32, rpo: u32, backup_frequency: u32) {
        self.first_day_compromised.push(first_day_compromised(series));

        let days = days_compromised(series);
        if days < rto {
            self.simulations_rto_passed += 1;
        }
        self.total_days_compromised.push(days);

        self.times_compromised.push(times_compromised(series));

        let lost = days_data_lost(series, backup_frequency);
        if lost < rpo {
            self.simulations_rpo_passed += 1;
        }
        self.days_data_lost.push(lost);
    }

    pub fn first_day_summary(&self) -> FiveNumberSummary {
        summarize(self.first_day_compromised.iter().copied())
    }

    pub fn days_compromised_summary(&self) -> FiveNumberSummary {
        summarize(self.total_days_compromised.iter().map(|&v| v as i64))
    }

    pub fn times_compromised_summary(&self) -> FiveNumberSummary {
        summarize(self.times_compromised.iter().map(|&v| v as i64))
    }

    pub fn days_data_lost_summary(&self) -> FiveNumberSummary {
        summarize(self.days_data_lost.iter().map(|&v| v as i64))
    }
}

/// Five-number summary plus average, ready for box plots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Rounded to two decimal places; 0.0 for an empty distribution.
    pub average: f64,
}

/// Index of the first `true`, else [`NEVER_COMPROMISED`].
pub fn first_day_compromised(series: &[bool]) -> i64 {
    series
        .iter()
        .position(|&compromised| compromised)
        .map(|day| day as i64)
        .unwrap_or(NEVER_COMPROMISED)
}

/// Count of compromised days.
pub fn days_compromised(series: &[bool]) -> u32 {
    series.iter().filter(|&&compromised| compromised).count() as u32
}

/// Count of false-to-true transitions. Patch-only toggles (true to false)
/// are not compromise events and are not counted.
pub fn times_compromised(series: &[bool]) -> u32 {
    let mut count = 0;
    let mut previous = false;
    for &compromised in series {
        if compromised && !previous {
            count += 1;
        }
        previous = compromised;
    }
    count
}

/// Total data-loss days across every outage in the series.
///
/// The series is partitioned into maximal contiguous compromised runs. Data
/// lost for an outage starting at day `s` is `s - last_backup_day`, where the
/// last backup day is tracked incrementally while scanning. After an outage
/// the backup pointer resets to `outage_end - (outage_end % backup_frequency)`
/// so overlapping backups are not double counted.
///
/// `backup_frequency` must be nonzero; the public entry points reject zero
/// before this is ever reached.
pub fn days_data_lost(series: &[bool], backup_frequency: u32) -> u32 {
    debug_assert!(backup_frequency > 0);
    let frequency = backup_frequency as usize;
    let days = series.len();

    let mut total = 0;
    let mut last_backup_day = 0;
    let mut day = 0;
    while day < days {
        if day % frequency == 0 {
            last_backup_day = day;
        }

        if series[day] {
            let outage_start = day;
            let mut outage_end = day;
            while outage_end < days && series[outage_end] {
                outage_end += 1;
            }
            total += outage_start - last_backup_day;
            day = outage_end;
            last_backup_day = outage_end - (outage_end % frequency);
        } else {
            day += 1;
        }
    }
    total as u32
}

/// Average rounded to two decimal places; 0.0 for an empty list.
pub fn average(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: i64 = values.iter().sum();
    let mean = sum as f64 / values.len() as f64;
    (mean * 100.0).round() / 100.0
}

/// Five-number summary of a distribution.
///
/// Negative sentinels are filtered out before anything is computed, so a node
/// that was never compromised does not drag the first-day quartiles down.
/// Quartiles are positional medians over the sorted list: Q1 is the median of
/// the lower half, Q3 of the upper half (exclusive of the middle element for
/// odd lengths).
pub fn summarize(values: impl IntoIterator<Item = i64>) -> FiveNumberSummary {
    let mut values: Vec<i64> = values.into_iter().filter(|&v| v >= 0).collect();
    values.sort_unstable();
    let avg = average(&values);

    match values.len() {
        0 => FiveNumberSummary::default(),
        1 => {
            let only = values[0] as f64;
            FiveNumberSummary {
                min: only,
                q1: only,
                median: only,
                q3: only,
                max: only,
                average: avg,
            }
        }
        n => FiveNumberSummary {
            min: values[0] as f64,
            q1: median(&values, 0, n / 2),
            median: median(&values, 0, n),
            q3: median(&values, (n + 1) / 2, n),
            max: values[n - 1] as f64,
            average: avg,
        },
    }
}

fn median(sorted: &[i64], start: usize, end: usize) -> f64 {
    let length = end - start;
    if length % 2 == 0 {
        (sorted[start + length / 2 - 1] + sorted[start + length / 2]) as f64 / 2.0
    } else {
        sorted[start + length / 2] as f64
    }
}

/// Reduce a set of sealed ledgers into per-node statistics.
///
/// This is also the recompute entry point: feed it ledgers reloaded from
/// persistence with different `rto`/`rpo`/`backup_frequency` values and get
/// fresh compliance counts without re-running the stochastic simulation.
pub fn compute_statistics(
    ledgers: &[RunLedger],
    rto: u32,
    rpo: u32,
    backup_frequency: u32,
) -> Result<HashMap<NodeId, NodeStatistics>> {
    if backup_frequency == 0 {
        return Err(Error::invalid_config(
            "backup_frequency",
            "must be greater than zero",
        ));
    }

    let mut statistics: HashMap<NodeId, NodeStatistics> = HashMap::new();
    for ledger in ledgers {
        for (node, series) in ledger.series() {
            statistics
                .entry(node.clone())
                .or_default()
                .record_run(series, rto, rpo, backup_frequency);
        }
    }
    Ok(statistics)
}
