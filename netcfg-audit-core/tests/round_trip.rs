use std::fs;
use std::path::PathBuf;

use netcfg_audit_core::{
    evaluate_run, format_json, load_file, parse_json, CompiledBaseline, EvalOptions, NullSink,
    TargetInput, TargetProvider, TargetResult, TargetSource,
};
use pretty_assertions::assert_eq;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

struct FixtureFiles;

impl TargetProvider for FixtureFiles {
    type Error = std::io::Error;

    fn fetch(
        &mut self,
        target: &str,
        _baseline: &CompiledBaseline,
    ) -> Result<TargetInput, Self::Error> {
        let path = fixture("fixtures/configs").join(target);
        Ok(TargetInput::offline(fs::read_to_string(path)?))
    }
}

#[test]
fn json_round_trip_preserves_targets_and_outcomes() {
    let baseline = load_file(&fixture("fixtures/baseline.yaml")).expect("baseline");
    let run = evaluate_run(
        TargetSource::File,
        ["sw1.cfg", "missing.cfg", "sw2.cfg"],
        &mut FixtureFiles,
        &baseline,
        EvalOptions::default(),
        &mut NullSink,
    );

    let json = format_json(&run);
    let reparsed = parse_json(&json).expect("re-parse should succeed");
    assert_eq!(run, reparsed);
    assert_eq!(
        reparsed.targets.keys().collect::<Vec<_>>(),
        vec!["sw1.cfg", "missing.cfg", "sw2.cfg"]
    );
    assert!(reparsed.targets["missing.cfg"].is_error());
}

#[test]
fn json_uses_status_tag_and_upper_case_verdicts() {
    let baseline = load_file(&fixture("fixtures/baseline.yaml")).expect("baseline");
    let run = evaluate_run(
        TargetSource::File,
        ["sw2.cfg"],
        &mut FixtureFiles,
        &baseline,
        EvalOptions::default(),
        &mut NullSink,
    );

    let value: serde_json::Value = serde_json::from_str(&format_json(&run)).expect("json");
    assert_eq!(value["source"], "file");
    let target = &value["targets"]["sw2.cfg"];
    assert_eq!(target["status"], "evaluated");
    assert_eq!(target["global"][0]["rule"], "hostname");
    assert_eq!(target["global"][0]["result"], "PASS");
    assert_eq!(
        target["interfaces"]["GigabitEthernet0/1"]["classification"],
        "TRUNK"
    );
    assert!(target.get("show_commands").is_none());

    match &run.targets["sw2.cfg"] {
        TargetResult::Evaluated(device) => assert!(device.device_info.is_none()),
        TargetResult::Error { message } => panic!("unexpected error: {message}"),
    }
}
