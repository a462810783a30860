//! Baseline documents: the declarative list of commands a device is expected
//! to carry, loaded from YAML and compiled once before any target is checked.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::matcher::{MatchMode, PatternError, RuleSet};

/// Errors raised while loading or compiling a baseline.
#[derive(Debug, Error)]
pub enum BaselineError {
    /// Baseline file could not be read.
    #[error("failed to read baseline file: {0}")]
    Io(#[from] std::io::Error),
    /// Baseline text is not valid YAML or does not have the expected shape.
    #[error("failed to parse baseline YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// A rule pattern is not a valid regular expression.
    #[error("invalid rule in {scope}: {source}")]
    InvalidPattern {
        scope: String,
        #[source]
        source: PatternError,
    },
}

/// A list of rule patterns. YAML may spell it as a sequence or as a mapping
/// whose keys are the patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleList(Vec<String>);

impl RuleList {
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for RuleList {
    fn from(value: Vec<String>) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for RuleList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Sequence(Vec<String>),
            Mapping(IndexMap<String, IgnoredAny>),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Sequence(patterns) => Self(patterns),
            Raw::Mapping(map) => Self(map.into_keys().collect()),
        })
    }
}

/// Baseline as written by the operator. An absent key is distinct from an
/// empty list: absent sections are not evaluated at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Baseline {
    pub global_commands: Option<RuleList>,
    pub interface_commands: Option<RuleList>,
    pub trunk_interface_commands: Option<RuleList>,
    pub interface_exclude: Option<RuleList>,
    pub show_commands: Option<IndexMap<String, RuleList>>,
}

/// Baseline with every pattern compiled in the mode its section uses.
#[derive(Debug, Clone, Default)]
pub struct CompiledBaseline {
    pub global: Option<RuleSet>,
    pub interface: Option<RuleSet>,
    pub trunk: Option<RuleSet>,
    pub exclude: Option<RuleSet>,
    pub show: Option<IndexMap<String, RuleSet>>,
}

impl CompiledBaseline {
    /// Compile every section. Any invalid pattern fails the whole baseline.
    pub fn compile(baseline: &Baseline) -> Result<Self, BaselineError> {
        let show = match &baseline.show_commands {
            Some(commands) => {
                let mut compiled = IndexMap::with_capacity(commands.len());
                for (command, list) in commands {
                    let scope = format!("show_commands.{command}");
                    compiled.insert(command.clone(), compile_list(list, MatchMode::DotAll, &scope)?);
                }
                Some(compiled)
            }
            None => None,
        };

        Ok(Self {
            global: compile_section(
                baseline.global_commands.as_ref(),
                MatchMode::LineAnchored,
                "global_commands",
            )?,
            interface: compile_section(
                baseline.interface_commands.as_ref(),
                MatchMode::MultiLine,
                "interface_commands",
            )?,
            trunk: compile_section(
                baseline.trunk_interface_commands.as_ref(),
                MatchMode::MultiLine,
                "trunk_interface_commands",
            )?,
            exclude: compile_section(
                baseline.interface_exclude.as_ref(),
                MatchMode::MultiLine,
                "interface_exclude",
            )?,
            show,
        })
    }

    /// Show commands a live session must capture, in baseline order.
    pub fn show_command_names(&self) -> impl Iterator<Item = &str> {
        self.show
            .iter()
            .flat_map(|commands| commands.keys().map(String::as_str))
    }
}

/// Parse baseline YAML text.
pub fn parse(yaml: &str) -> Result<Baseline, BaselineError> {
    // An empty document is a baseline with no sections.
    if yaml.trim().is_empty() {
        return Ok(Baseline::default());
    }
    Ok(serde_yaml::from_str(yaml)?)
}

/// Parse a baseline YAML file.
pub fn parse_file(path: &Path) -> Result<Baseline, BaselineError> {
    let raw = fs::read_to_string(path)?;
    parse(&raw)
}

/// Parse and compile a baseline YAML file.
pub fn load_file(path: &Path) -> Result<CompiledBaseline, BaselineError> {
    CompiledBaseline::compile(&parse_file(path)?)
}

fn compile_section(
    list: Option<&RuleList>,
    mode: MatchMode,
    scope: &str,
) -> Result<Option<RuleSet>, BaselineError> {
    list.map(|list| compile_list(list, mode, scope)).transpose()
}

fn compile_list(list: &RuleList, mode: MatchMode, scope: &str) -> Result<RuleSet, BaselineError> {
    RuleSet::compile(list.patterns(), mode).map_err(|source| BaselineError::InvalidPattern {
        scope: scope.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::{parse, BaselineError, CompiledBaseline, RuleList};
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_all_sections() {
        let baseline = parse(
            r#"
global_commands:
  - hostname
  - service password-encryption
interface_commands:
  - no shutdown
trunk_interface_commands:
  - switchport trunk allowed vlan
interface_exclude:
  - Loopback
show_commands:
  vtp status:
    - "VTP Operating Mode\\s+: Transparent"
"#,
        )
        .expect("parse");

        assert_eq!(
            baseline.global_commands,
            Some(RuleList::from(vec![
                "hostname".to_string(),
                "service password-encryption".to_string()
            ]))
        );
        let show = baseline.show_commands.expect("show commands");
        assert_eq!(show.keys().collect::<Vec<_>>(), vec!["vtp status"]);
    }

    #[test]
    fn mapping_form_uses_keys_as_patterns() {
        let baseline = parse(
            r#"
global_commands:
  hostname: {}
  "ip ssh version 2": null
"#,
        )
        .expect("parse");
        let patterns: Vec<&str> = baseline
            .global_commands
            .as_ref()
            .expect("global")
            .patterns()
            .collect();
        assert_eq!(patterns, vec!["hostname", "ip ssh version 2"]);
    }

    #[test]
    fn absent_sections_stay_absent() {
        let compiled = CompiledBaseline::compile(&parse("global_commands: [hostname]").expect("parse"))
            .expect("compile");
        assert!(compiled.global.is_some());
        assert!(compiled.interface.is_none());
        assert!(compiled.trunk.is_none());
        assert_eq!(compiled.show_command_names().count(), 0);
    }

    #[test]
    fn empty_document_is_empty_baseline() {
        let compiled = CompiledBaseline::compile(&parse("\n").expect("parse")).expect("compile");
        assert!(compiled.global.is_none());
        assert!(compiled.show.is_none());
    }

    #[test]
    fn invalid_pattern_names_its_section() {
        let baseline = parse(
            r#"
show_commands:
  version:
    - "Cisco IOS ("
"#,
        )
        .expect("parse");
        let err = CompiledBaseline::compile(&baseline).expect_err("must fail");
        assert!(matches!(err, BaselineError::InvalidPattern { ref scope, .. } if scope == "show_commands.version"));
        assert!(err.to_string().contains("show_commands.version"));
    }

    #[test]
    fn duplicate_global_rules_compile_once() {
        let compiled = CompiledBaseline::compile(
            &parse("global_commands: [hostname, hostname, ntp server]").expect("parse"),
        )
        .expect("compile");
        assert_eq!(compiled.global.expect("global").len(), 2);
    }
}
