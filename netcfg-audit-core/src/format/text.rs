use serde::Serialize;

use crate::eval::engine::GLOBAL_SCOPE;
use crate::eval::result::{
    Classification, DeviceResult, RunResult, TargetResult, Verdict,
};

/// Type column value for show-command rows.
pub const SHOW_KIND: &str = "SHOW";

/// One line of the four-column check table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub scope: String,
    pub command: String,
    pub kind: String,
    pub result: String,
}

impl ReportRow {
    fn new(scope: &str, command: &str, kind: &str, result: &str) -> Self {
        Self {
            scope: scope.to_string(),
            command: command.to_string(),
            kind: kind.to_string(),
            result: result.to_string(),
        }
    }
}

/// Flatten one device result into table rows: global rules, then interfaces
/// grouped access, trunk, excluded, then show commands.
pub fn format_rows(device: &DeviceResult) -> Vec<ReportRow> {
    let mut rows = Vec::new();

    for outcome in &device.global {
        rows.push(ReportRow::new(
            GLOBAL_SCOPE,
            &outcome.rule,
            GLOBAL_SCOPE,
            outcome.result.as_str(),
        ));
    }

    for class in [Classification::Access, Classification::Trunk] {
        for record in device.interfaces_of(class) {
            for outcome in record.tests.iter().flatten() {
                rows.push(ReportRow::new(
                    &record.name,
                    &outcome.rule,
                    class.as_str(),
                    outcome.result.as_str(),
                ));
            }
        }
    }
    for record in device.interfaces_of(Classification::Excluded) {
        rows.push(ReportRow::new(
            &record.name,
            "",
            "",
            Classification::Excluded.as_str(),
        ));
    }

    for (command, show) in device.show_commands.iter().flatten() {
        for outcome in &show.tests {
            rows.push(ReportRow::new(
                command,
                &outcome.rule,
                SHOW_KIND,
                outcome.result.as_str(),
            ));
        }
    }

    rows
}

/// Totals across a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub targets: usize,
    pub evaluated: usize,
    pub errors: usize,
    pub passed: usize,
    pub failed: usize,
}

impl RunSummary {
    /// True when nothing failed and every target was evaluated.
    pub fn is_clean(&self) -> bool {
        self.errors == 0 && self.failed == 0
    }
}

pub fn summarize(run: &RunResult) -> RunSummary {
    let mut summary = RunSummary::default();
    for result in run.targets.values() {
        summary.targets += 1;
        match result {
            TargetResult::Evaluated(device) => {
                summary.evaluated += 1;
                summary.passed += device.count(Verdict::Pass);
                summary.failed += device.count(Verdict::Fail);
            }
            TargetResult::Error { .. } => summary.errors += 1,
        }
    }
    summary
}

/// Format a simple summary of run counts.
pub fn format_summary(run: &RunResult) -> String {
    let s = summarize(run);
    format!(
        "targets={} evaluated={} errors={} passed={} failed={}",
        s.targets, s.evaluated, s.errors, s.passed, s.failed
    )
}
