//! Progress events emitted while a run is evaluated.
//!
//! The engine never logs on its own. Callers hand in an [`EventSink`] and
//! decide where events go.

use crate::eval::result::{Classification, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEvent<'a> {
    TargetStarted {
        target: &'a str,
    },
    InterfaceClassified {
        name: &'a str,
        classification: Classification,
    },
    /// A rule was evaluated. `scope` is `GLOBAL`, an interface name, or a
    /// show command.
    RuleChecked {
        scope: &'a str,
        rule: &'a str,
        verdict: Verdict,
    },
    TargetEvaluated {
        target: &'a str,
        passed: usize,
        failed: usize,
    },
    TargetFailed {
        target: &'a str,
        message: &'a str,
    },
}

pub trait EventSink {
    fn record(&mut self, event: AuditEvent<'_>);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn record(&mut self, event: AuditEvent<'_>) {
        (**self).record(event);
    }
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _event: AuditEvent<'_>) {}
}
