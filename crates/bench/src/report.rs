use std::io::{self, Write};

use serde_json::json;

use crate::trial::TrialStats;

/// Output format for trial reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Three human-readable lines per trial, blank line between trials.
    #[default]
    Human,
    /// NDJSON, one object per trial.
    Json,
}

/// Print one trial's report to `out`.
///
/// A trial that finished in under a millisecond has no meaningful
/// throughput; the human format says "unavailable" and JSON emits null.
pub fn print_trial<W: Write>(
    out: &mut W,
    format: ReportFormat,
    stats: &TrialStats,
    samples: u64,
) -> io::Result<()> {
    match format {
        ReportFormat::Human => {
            writeln!(out, "Total time: {} ms", stats.total_ms())?;
            writeln!(out, "Max time per batch: {} ms", stats.max_batch_ms())?;
            match stats.transfers_per_second(samples) {
                Some(tps) => writeln!(out, "Transfers per second: {tps}")?,
                None => writeln!(out, "Transfers per second: unavailable")?,
            }
            writeln!(out)
        }
        ReportFormat::Json => {
            let line = json!({
                "total_ms": stats.total_ms(),
                "max_batch_ms": stats.max_batch_ms(),
                "transfers_per_second": stats.transfers_per_second(samples),
            });
            writeln!(out, "{line}")
        }
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
