use indexmap::IndexMap;
use thiserror::Error;

use crate::baseline::CompiledBaseline;
use crate::block::{interface_blocks, InterfaceBlock};
use crate::eval::result::{
    Classification, DeviceInfo, DeviceResult, InterfaceRecord, RuleOutcome, ShowCommandResult,
    Verdict, UNKNOWN_MODEL,
};
use crate::events::{AuditEvent, EventSink};
use crate::matcher::RuleSet;

/// Scope label used for global rules in events and report rows.
pub const GLOBAL_SCOPE: &str = "GLOBAL";

const MODEL_MARKER: &str = "Model Number";

/// Configures evaluation behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalOptions {
    /// Record only failing rules. Matching is unaffected.
    pub failed_only: bool,
}

/// Errors that stop evaluation of a single target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The baseline checks a show command whose output was not captured.
    #[error("no output captured for show command '{command}'")]
    MissingShowOutput { command: String },
}

/// Raw text collected for one target.
///
/// File targets only carry configuration text. Live devices also carry
/// show-command output keyed by command name and version output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetInput {
    pub configuration: String,
    pub show_outputs: Option<IndexMap<String, String>>,
    pub version: Option<String>,
}

impl TargetInput {
    pub fn offline(configuration: impl Into<String>) -> Self {
        Self {
            configuration: configuration.into(),
            ..Self::default()
        }
    }

    pub fn online(
        configuration: impl Into<String>,
        show_outputs: IndexMap<String, String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            configuration: configuration.into(),
            show_outputs: Some(show_outputs),
            version: Some(version.into()),
        }
    }
}

/// Run every rule in `rules` against `text`.
pub fn check_rules(
    text: &str,
    rules: &RuleSet,
    scope: &str,
    opts: EvalOptions,
    sink: &mut dyn EventSink,
) -> Vec<RuleOutcome> {
    let mut out = Vec::with_capacity(rules.len());
    for rule in rules.iter() {
        let verdict = Verdict::from_match(rule.matches(text));
        sink.record(AuditEvent::RuleChecked {
            scope,
            rule: rule.id(),
            verdict,
        });
        if opts.failed_only && verdict == Verdict::Pass {
            continue;
        }
        out.push(RuleOutcome {
            rule: rule.id().to_string(),
            result: verdict,
        });
    }
    out
}

/// Check global rules against the whole configuration.
pub fn check_global(
    config: &str,
    baseline: &CompiledBaseline,
    opts: EvalOptions,
    sink: &mut dyn EventSink,
) -> Vec<RuleOutcome> {
    match &baseline.global {
        Some(rules) => check_rules(config, rules, GLOBAL_SCOPE, opts, sink),
        None => Vec::new(),
    }
}

/// Classify one block. Exclude patterns see the full header line, keyword
/// included.
pub fn classify(block: &InterfaceBlock<'_>, exclude: Option<&RuleSet>) -> Classification {
    if exclude.is_some_and(|rules| rules.any_match(block.header())) {
        Classification::Excluded
    } else if block.is_trunk() {
        Classification::Trunk
    } else {
        Classification::Access
    }
}

/// Classify every interface block and check it against its class's rules.
///
/// Classification runs whatever the baseline holds. An interface whose class
/// has no section in the baseline keeps its raw text but gets no tests.
pub fn check_interfaces(
    config: &str,
    baseline: &CompiledBaseline,
    opts: EvalOptions,
    sink: &mut dyn EventSink,
) -> IndexMap<String, InterfaceRecord> {
    let mut records = IndexMap::new();
    for block in interface_blocks(config) {
        let name = block.name();
        let classification = classify(&block, baseline.exclude.as_ref());
        sink.record(AuditEvent::InterfaceClassified {
            name,
            classification,
        });

        let rules = match classification {
            Classification::Excluded => {
                records.insert(
                    name.to_string(),
                    InterfaceRecord {
                        name: name.to_string(),
                        classification,
                        tests: Some(Vec::new()),
                        raw_data: None,
                    },
                );
                continue;
            }
            Classification::Trunk => baseline.trunk.as_ref(),
            Classification::Access => baseline.interface.as_ref(),
        };

        let raw = block.raw_text();
        let tests = match rules {
            Some(rules) => Some(check_rules(raw, rules, name, opts, sink)),
            None => None,
        };
        records.insert(
            name.to_string(),
            InterfaceRecord {
                name: name.to_string(),
                classification,
                tests,
                raw_data: Some(raw.to_string()),
            },
        );
    }
    records
}

/// Check captured show-command output. Every command the baseline names must
/// have an entry in `outputs`.
pub fn check_show(
    outputs: &IndexMap<String, String>,
    commands: &IndexMap<String, RuleSet>,
    opts: EvalOptions,
    sink: &mut dyn EventSink,
) -> Result<IndexMap<String, ShowCommandResult>, EvalError> {
    let mut results = IndexMap::with_capacity(commands.len());
    for (command, rules) in commands {
        let raw = outputs
            .get(command)
            .ok_or_else(|| EvalError::MissingShowOutput {
                command: command.clone(),
            })?;
        let tests = check_rules(raw, rules, command, opts, sink);
        results.insert(
            command.clone(),
            ShowCommandResult {
                tests,
                raw_data: raw.clone(),
            },
        );
    }
    Ok(results)
}

/// Pull the model identifier out of version output.
pub fn extract_device_info(version: &str) -> DeviceInfo {
    let model = version
        .lines()
        .find_map(|line| line.find(MODEL_MARKER).map(|at| &line[at..]))
        .and_then(model_from_line)
        .filter(|model| !model.is_empty())
        .unwrap_or(UNKNOWN_MODEL);
    DeviceInfo {
        model: model.to_string(),
    }
}

// "Model Number                    : WS-C2960X-48FPD-L"
fn model_from_line(line: &str) -> Option<&str> {
    let (_, value) = line.split_once(':')?;
    let mut chars = value.chars();
    chars.next();
    Some(chars.as_str().trim_end())
}

/// Build the full result for one target.
pub fn evaluate_device(
    input: &TargetInput,
    baseline: &CompiledBaseline,
    opts: EvalOptions,
    sink: &mut dyn EventSink,
) -> Result<DeviceResult, EvalError> {
    let config = input.configuration.as_str();
    let global = check_global(config, baseline, opts, sink);
    let interfaces = check_interfaces(config, baseline, opts, sink);

    let show_commands = match (&input.show_outputs, &baseline.show) {
        (Some(outputs), Some(commands)) => Some(check_show(outputs, commands, opts, sink)?),
        (Some(_), None) => Some(IndexMap::new()),
        (None, _) => None,
    };
    let device_info = input.version.as_deref().map(extract_device_info);

    Ok(DeviceResult {
        global,
        interfaces,
        show_commands,
        device_info,
    })
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    use super::{
        check_global, check_interfaces, check_show, classify, extract_device_info, EvalError,
        EvalOptions,
    };
    use crate::baseline::{parse, CompiledBaseline};
    use crate::block::interface_blocks;
    use crate::eval::result::{Classification, RuleOutcome, Verdict};
    use crate::events::NullSink;
    use crate::matcher::{MatchMode, RuleSet};

    fn compiled(yaml: &str) -> CompiledBaseline {
        CompiledBaseline::compile(&parse(yaml).expect("parse")).expect("compile")
    }

    fn outcome(rule: &str, result: Verdict) -> RuleOutcome {
        RuleOutcome {
            rule: rule.to_string(),
            result,
        }
    }

    #[test]
    fn global_rules_pass_and_fail_in_rule_order() {
        let baseline = compiled("global_commands: [ntp server, hostname, 'no ip http server']");
        let got = check_global(
            "hostname R1\nno ip http server\n",
            &baseline,
            EvalOptions::default(),
            &mut NullSink,
        );
        assert_eq!(
            got,
            vec![
                outcome("ntp server", Verdict::Fail),
                outcome("hostname", Verdict::Pass),
                outcome("no ip http server", Verdict::Pass),
            ]
        );
    }

    #[test]
    fn failed_only_drops_passes() {
        let baseline = compiled("global_commands: [ntp server, hostname]");
        let got = check_global(
            "hostname R1\n",
            &baseline,
            EvalOptions { failed_only: true },
            &mut NullSink,
        );
        assert_eq!(got, vec![outcome("ntp server", Verdict::Fail)]);
    }

    #[test]
    fn exclusion_beats_trunk() {
        let exclude = RuleSet::compile(["Port-channel"], MatchMode::MultiLine).expect("compile");
        let blocks = interface_blocks("interface Port-channel1\n switchport mode trunk\n!\n");
        assert_eq!(classify(&blocks[0], Some(&exclude)), Classification::Excluded);
        assert_eq!(classify(&blocks[0], None), Classification::Trunk);
    }

    #[test]
    fn exclusion_sees_interface_keyword() {
        let exclude = RuleSet::compile(["^interface Vlan"], MatchMode::MultiLine).expect("compile");
        let blocks = interface_blocks("interface Vlan10\n no shutdown\n!\n");
        assert_eq!(classify(&blocks[0], Some(&exclude)), Classification::Excluded);
    }

    #[test]
    fn access_only_baseline_leaves_trunks_untested() {
        let baseline = compiled("interface_commands: [no shutdown]");
        let records = check_interfaces(
            "interface Gi0/1\n switchport mode trunk\n!\ninterface Gi0/2\n no shutdown\n!\n",
            &baseline,
            EvalOptions::default(),
            &mut NullSink,
        );

        let trunk = &records["Gi0/1"];
        assert_eq!(trunk.classification, Classification::Trunk);
        assert_eq!(trunk.tests, None);
        assert!(trunk.raw_data.is_some());

        let access = &records["Gi0/2"];
        assert_eq!(access.tests, Some(vec![outcome("no shutdown", Verdict::Pass)]));
    }

    #[test]
    fn trunk_only_baseline_leaves_access_untested() {
        let baseline = compiled("trunk_interface_commands: [switchport nonegotiate]");
        let records = check_interfaces(
            "interface Gi0/1\n switchport mode trunk\n!\ninterface Gi0/2\n no shutdown\n!\n",
            &baseline,
            EvalOptions::default(),
            &mut NullSink,
        );
        assert_eq!(
            records["Gi0/1"].tests,
            Some(vec![outcome("switchport nonegotiate", Verdict::Fail)])
        );
        assert_eq!(records["Gi0/2"].classification, Classification::Access);
        assert_eq!(records["Gi0/2"].tests, None);
    }

    #[test]
    fn classification_runs_without_interface_sections() {
        let baseline = compiled("global_commands: [hostname]\ninterface_exclude: [Loopback]");
        let records = check_interfaces(
            "interface Loopback0\n!\ninterface Gi0/1\n switchport mode trunk\n!\ninterface Gi0/2\n!\n",
            &baseline,
            EvalOptions::default(),
            &mut NullSink,
        );

        let loopback = &records["Loopback0"];
        assert_eq!(loopback.classification, Classification::Excluded);
        assert_eq!(loopback.tests, Some(Vec::new()));
        assert_eq!(loopback.raw_data, None);

        assert_eq!(records["Gi0/1"].classification, Classification::Trunk);
        assert_eq!(records["Gi0/1"].tests, None);
        assert_eq!(records["Gi0/2"].classification, Classification::Access);
        assert_eq!(records["Gi0/2"].tests, None);
        assert_eq!(
            records["Gi0/2"].raw_data.as_deref(),
            Some("interface Gi0/2\n")
        );
    }

    #[test]
    fn excluded_interfaces_carry_empty_tests() {
        let baseline = compiled("interface_commands: [no shutdown]\ninterface_exclude: [Loopback]");
        let records = check_interfaces(
            "interface Loopback0\n ip address 1.1.1.1 255.255.255.255\n!\n",
            &baseline,
            EvalOptions::default(),
            &mut NullSink,
        );
        let record = &records["Loopback0"];
        assert_eq!(record.classification, Classification::Excluded);
        assert_eq!(record.tests, Some(Vec::new()));
        assert_eq!(record.raw_data, None);
    }

    #[test]
    fn show_rules_span_lines() {
        let baseline = compiled(
            r#"
show_commands:
  spanning-tree summary:
    - "Root bridge for:.*VLAN0010"
    - "Loopguard Default\\s+is enabled"
"#,
        );
        let mut outputs = IndexMap::new();
        outputs.insert(
            "spanning-tree summary".to_string(),
            "Switch is in rapid-pvst mode\nRoot bridge for:\n  VLAN0010\nLoopguard Default is disabled\n".to_string(),
        );
        let got = check_show(
            &outputs,
            baseline.show.as_ref().expect("show"),
            EvalOptions::default(),
            &mut NullSink,
        )
        .expect("show");
        let tests = &got["spanning-tree summary"].tests;
        assert_eq!(
            tests,
            &vec![
                outcome("Root bridge for:.*VLAN0010", Verdict::Pass),
                outcome("Loopguard Default\\s+is enabled", Verdict::Fail),
            ]
        );
        assert!(got["spanning-tree summary"].raw_data.contains("rapid-pvst"));
    }

    #[test]
    fn missing_show_output_is_an_error() {
        let baseline = compiled("show_commands:\n  vtp status: [Transparent]\n");
        let err = check_show(
            &IndexMap::new(),
            baseline.show.as_ref().expect("show"),
            EvalOptions::default(),
            &mut NullSink,
        )
        .expect_err("must fail");
        assert_eq!(
            err,
            EvalError::MissingShowOutput {
                command: "vtp status".to_string()
            }
        );
    }

    #[test]
    fn model_is_read_after_colon() {
        let version = "Cisco IOS Software\nModel revision number           : C0\nModel Number                    : WS-C2960X-48FPD-L\nSystem serial number            : FOC1234\n";
        assert_eq!(extract_device_info(version).model, "WS-C2960X-48FPD-L");
    }

    #[test]
    fn model_defaults_to_unknown() {
        assert_eq!(
            extract_device_info("Cisco Nexus Operating System (NX-OS) Software\n").model,
            "UNKNOWN"
        );
        assert_eq!(extract_device_info("Model Number\n").model, "UNKNOWN");
    }
}
