use netcfg_audit_core::{AuditEvent, EventSink, Verdict};
use tracing::{debug, error, info};

/// Forwards audit events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&mut self, event: AuditEvent<'_>) {
        match event {
            AuditEvent::TargetStarted { target } => debug!(target_name = target, "checking target"),
            AuditEvent::InterfaceClassified {
                name,
                classification,
            } => debug!(interface = name, %classification, "interface classified"),
            AuditEvent::RuleChecked {
                scope,
                rule,
                verdict: Verdict::Fail,
            } => debug!(scope, rule, "rule failed"),
            AuditEvent::RuleChecked { .. } => {}
            AuditEvent::TargetEvaluated {
                target,
                passed,
                failed,
            } => info!(target_name = target, passed, failed, "target checked"),
            AuditEvent::TargetFailed { target, message } => {
                error!("     Error while checking {target}: {message}");
            }
        }
    }
}
