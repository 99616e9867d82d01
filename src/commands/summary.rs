use crate::collect::FetchOutcome;
use crate::reports::ResourceKind;
use camino::Utf8PathBuf;
use core::time::Duration;
use std::collections::BTreeMap;
use std::io::Write;

/// Tally of everything a run fetched and wrote.
#[derive(Debug, Default)]
pub struct RunSummary {
    rows: BTreeMap<(ResourceKind, Utf8PathBuf), usize>,
    skipped: usize,
    unavailable: usize,
    failed: usize,
    failed_writes: usize,
}

impl RunSummary {
    pub fn record<T>(&mut self, outcome: &FetchOutcome<T>) {
        match outcome {
            FetchOutcome::Fetched(_) => {}
            FetchOutcome::Skipped(_) => self.skipped += 1,
            FetchOutcome::Unavailable => self.unavailable += 1,
            FetchOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn record_rows(&mut self, kind: ResourceKind, path: Utf8PathBuf, count: usize) {
        *self.rows.entry((kind, path)).or_default() += count;
    }

    pub const fn record_write_failure(&mut self) {
        self.failed_writes += 1;
    }

    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.unavailable > 0 || self.failed > 0 || self.failed_writes > 0
    }

    pub fn write_to(&self, mut w: impl Write, elapsed: Duration) -> std::io::Result<()> {
        writeln!(w)?;
        writeln!(w, "Summary")?;
        for ((kind, path), count) in &self.rows {
            writeln!(w, "  {count:>8} {kind:<16} {path}")?;
        }

        if self.skipped > 0 {
            writeln!(w, "  {:>8} requests skipped", self.skipped)?;
        }

        if self.has_failures() {
            writeln!(
                w,
                "  {} unavailable, {} failed, {} failed writes",
                self.unavailable, self.failed, self.failed_writes
            )?;
        }

        writeln!(w, "Analysis completed in {:.3}s", elapsed.as_secs_f64())
    }
}
