use std::fmt::{self, Display, Formatter};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Model string reported when version output carries no model line.
pub const UNKNOWN_MODEL: &str = "UNKNOWN";

/// Outcome of one rule against one text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn from_match(matched: bool) -> Self {
        if matched {
            Self::Pass
        } else {
            Self::Fail
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rule, identified by its literal pattern, and its verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule: String,
    pub result: Verdict,
}

/// Interface class. Precedence is excluded, then trunk, then access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Classification {
    Access,
    Trunk,
    Excluded,
}

impl Classification {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Access => "ACCESS",
            Self::Trunk => "TRUNK",
            Self::Excluded => "EXCLUDED",
        }
    }
}

impl Display for Classification {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-interface result.
///
/// `tests` is `Some(vec![])` for excluded interfaces and `None` when the
/// baseline has no rule section for the interface's class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceRecord {
    pub name: String,
    pub classification: Classification,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<Vec<RuleOutcome>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<String>,
}

/// Results for one show command together with the text they were run on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowCommandResult {
    pub tests: Vec<RuleOutcome>,
    pub raw_data: String,
}

/// Descriptive fields pulled from `show version` style output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub model: String,
}

/// Everything checked for one target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceResult {
    pub global: Vec<RuleOutcome>,
    #[serde(default)]
    pub interfaces: IndexMap<String, InterfaceRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_commands: Option<IndexMap<String, ShowCommandResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_info: Option<DeviceInfo>,
}

impl DeviceResult {
    /// Every recorded rule outcome across all sections.
    pub fn outcomes(&self) -> impl Iterator<Item = &RuleOutcome> {
        let interfaces = self
            .interfaces
            .values()
            .flat_map(|record| record.tests.iter().flatten());
        let show = self
            .show_commands
            .iter()
            .flat_map(|map| map.values())
            .flat_map(|show| show.tests.iter());
        self.global.iter().chain(interfaces).chain(show)
    }

    pub fn count(&self, verdict: Verdict) -> usize {
        self.outcomes().filter(|o| o.result == verdict).count()
    }

    /// Interfaces of one class, in configuration order.
    pub fn interfaces_of(
        &self,
        classification: Classification,
    ) -> impl Iterator<Item = &InterfaceRecord> {
        self.interfaces
            .values()
            .filter(move |record| record.classification == classification)
    }
}

/// Slot for one target in a run: a result, or the marker that the target
/// could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TargetResult {
    Evaluated(DeviceResult),
    Error { message: String },
}

impl TargetResult {
    pub fn device(&self) -> Option<&DeviceResult> {
        match self {
            Self::Evaluated(device) => Some(device),
            Self::Error { .. } => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Where the targets of a run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetSource {
    File,
    Device,
}

impl TargetSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "FILE",
            Self::Device => "DEVICE",
        }
    }
}

/// All targets of one run, in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub source: TargetSource,
    pub targets: IndexMap<String, TargetResult>,
}

impl RunResult {
    pub fn new(source: TargetSource) -> Self {
        Self {
            source,
            targets: IndexMap::new(),
        }
    }
}
