//! Baseline rule engine for network device configuration audits.
//!
//! A baseline lists regular-expression rules grouped by scope: global
//! configuration lines, access and trunk interface blocks, and captured
//! show-command output. The engine splits configuration text into interface
//! blocks, classifies each block, runs the matching rules, and returns an
//! explicit result tree that callers render or serialize.
//!
//! ```ignore
//! use netcfg_audit_core::{evaluate_device, load_file, EvalOptions, NullSink, TargetInput};
//!
//! let baseline = load_file("baseline.yaml".as_ref())?;
//! let input = TargetInput::offline(std::fs::read_to_string("sw1.cfg")?);
//! let result = evaluate_device(&input, &baseline, EvalOptions::default(), &mut NullSink)?;
//! ```

pub mod baseline;
pub mod block;
pub mod eval;
pub mod events;
pub mod format;
pub mod matcher;

pub use baseline::{load_file, parse, parse_file, Baseline, BaselineError, CompiledBaseline, RuleList};
pub use block::{interface_blocks, InterfaceBlock};
pub use eval::{
    evaluate_device, evaluate_run, extract_device_info, Classification, DeviceInfo, DeviceResult,
    EvalError, EvalOptions, InterfaceRecord, RuleOutcome, RunResult, ShowCommandResult,
    TargetInput, TargetProvider, TargetResult, TargetSource, Verdict,
};
pub use events::{AuditEvent, EventSink, NullSink};
pub use format::{format_json, format_rows, format_summary, parse_json, summarize, ReportRow, RunSummary};
pub use matcher::{MatchMode, PatternError, Rule, RuleSet};
