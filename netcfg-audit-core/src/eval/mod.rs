//! Rule evaluation engine and its result model.

pub mod engine;
pub mod result;
pub mod run;

pub use engine::{
    check_global, check_interfaces, check_rules, check_show, classify, evaluate_device,
    extract_device_info, EvalError, EvalOptions, TargetInput, GLOBAL_SCOPE,
};
pub use result::{
    Classification, DeviceInfo, DeviceResult, InterfaceRecord, RuleOutcome, RunResult,
    ShowCommandResult, TargetResult, TargetSource, Verdict, UNKNOWN_MODEL,
};
pub use run::{evaluate_run, TargetProvider};
