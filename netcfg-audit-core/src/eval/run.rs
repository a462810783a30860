use std::fmt::Display;

use crate::baseline::CompiledBaseline;
use crate::eval::engine::{evaluate_device, EvalOptions, TargetInput};
use crate::eval::result::{RunResult, TargetResult, TargetSource, Verdict};
use crate::events::{AuditEvent, EventSink};

/// Supplies raw text for a named target: a file reader or a device session.
pub trait TargetProvider {
    type Error: Display;

    /// Collect input for `target`. An error means the target could not be
    /// reached or read; it is recorded for that target and the run moves on.
    fn fetch(
        &mut self,
        target: &str,
        baseline: &CompiledBaseline,
    ) -> Result<TargetInput, Self::Error>;
}

/// Evaluate targets one after another.
///
/// A failing target never aborts the run: its slot holds
/// [`TargetResult::Error`] and no partial result is kept.
pub fn evaluate_run<P, I>(
    source: TargetSource,
    targets: I,
    provider: &mut P,
    baseline: &CompiledBaseline,
    opts: EvalOptions,
    sink: &mut dyn EventSink,
) -> RunResult
where
    P: TargetProvider + ?Sized,
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut run = RunResult::new(source);

    for target in targets {
        let target: String = target.into();
        sink.record(AuditEvent::TargetStarted { target: &target });

        let slot = match provider.fetch(&target, baseline) {
            Ok(input) => match evaluate_device(&input, baseline, opts, sink) {
                Ok(device) => {
                    sink.record(AuditEvent::TargetEvaluated {
                        target: &target,
                        passed: device.count(Verdict::Pass),
                        failed: device.count(Verdict::Fail),
                    });
                    TargetResult::Evaluated(device)
                }
                Err(err) => failed_target(&target, err.to_string(), sink),
            },
            Err(err) => failed_target(&target, format!("{err:#}"), sink),
        };
        run.targets.insert(target, slot);
    }

    run
}

fn failed_target(target: &str, message: String, sink: &mut dyn EventSink) -> TargetResult {
    sink.record(AuditEvent::TargetFailed {
        target,
        message: &message,
    });
    TargetResult::Error { message }
}
