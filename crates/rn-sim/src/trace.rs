//! CSV trace output.
//!
//! Creates two files in the configured output directory:
//! - `pursuer_snapshots.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;
use rn_core::Tick;

use crate::{PursuerSnapshot, SimError, SimObserver, SimResult, TickSummary};

pub const SNAPSHOT_FILE: &str = "pursuer_snapshots.csv";
pub const SUMMARY_FILE: &str = "tick_summaries.csv";

/// A [`SimObserver`] writing pursuer snapshots and tick summaries to CSV.
///
/// Errors from the writers are stored internally because `SimObserver`
/// methods have no return value.  After `sim.run()` returns, check for errors
/// with [`take_error`][Self::take_error].
pub struct CsvTrace {
    snapshots:  Writer<File>,
    summaries:  Writer<File>,
    finished:   bool,
    last_error: Option<SimError>,
}

impl CsvTrace {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> SimResult<Self> {
        let mut snapshots = Writer::from_path(dir.join(SNAPSHOT_FILE))?;
        snapshots.write_record([
            "agent_id", "tick", "x", "y", "heading_x", "heading_y", "mode", "state",
            "distance_to_target",
        ])?;

        let mut summaries = Writer::from_path(dir.join(SUMMARY_FILE))?;
        summaries.write_record(["tick", "moving", "waiting", "quarry_x", "quarry_y"])?;

        Ok(Self {
            snapshots,
            summaries,
            finished:   false,
            last_error: None,
        })
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    pub fn take_error(&mut self) -> Option<SimError> {
        self.last_error.take()
    }

    /// Flush both files.  Called by `on_sim_end`; idempotent.
    pub fn finish(&mut self) -> SimResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        Ok(())
    }

    fn write_snapshots(&mut self, rows: &[PursuerSnapshot]) -> SimResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.agent.0.to_string(),
                row.tick.0.to_string(),
                row.position.x.to_string(),
                row.position.y.to_string(),
                row.heading.x.to_string(),
                row.heading.y.to_string(),
                row.mode.to_string(),
                format!("{:?}", row.state),
                row.distance_to_target.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_summary(&mut self, row: &TickSummary) -> SimResult<()> {
        self.summaries.write_record(&[
            row.tick.0.to_string(),
            row.moving.to_string(),
            row.waiting.to_string(),
            row.quarry.x.to_string(),
            row.quarry.y.to_string(),
        ])?;
        Ok(())
    }

    fn store_err(&mut self, result: SimResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl SimObserver for CsvTrace {
    fn on_tick_end(&mut self, summary: &TickSummary) {
        let result = self.write_summary(summary);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, _tick: Tick, pursuers: &[PursuerSnapshot]) {
        let result = self.write_snapshots(pursuers);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.finish();
        self.store_err(result);
    }
}
