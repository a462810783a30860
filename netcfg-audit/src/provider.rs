//! Target providers: saved configuration files and live devices.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use netcfg_audit_core::{CompiledBaseline, TargetInput, TargetProvider};
use tracing::{info, warn};

use crate::inventory::Inventory;
use crate::session::{Connector, DeviceSession, SessionError};

pub const RUNNING_CONFIG_COMMAND: &str = "show running-config";
pub const VERSION_COMMAND: &str = "show version";

/// Reads one configuration file per target from a directory.
#[derive(Debug, Clone)]
pub struct FileProvider {
    dir: PathBuf,
}

impl FileProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl TargetProvider for FileProvider {
    type Error = anyhow::Error;

    fn fetch(&mut self, target: &str, _baseline: &CompiledBaseline) -> Result<TargetInput> {
        let path = self.dir.join(target);
        let bytes =
            fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
        Ok(TargetInput::offline(String::from_utf8_lossy(&bytes)))
    }
}

/// Regular files in `dir`, by file name, sorted.
pub fn list_config_files(dir: &Path) -> Result<Vec<String>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list {}", dir.display()))?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => warn!(file = ?raw, "skipping file with non UTF-8 name"),
        }
    }
    names.sort();
    Ok(names)
}

/// Logs in to each inventory device and captures the text the baseline needs.
pub struct DeviceProvider<'a, C> {
    inventory: &'a Inventory,
    connector: C,
}

impl<'a, C: Connector> DeviceProvider<'a, C> {
    pub fn new(inventory: &'a Inventory, connector: C) -> Self {
        Self {
            inventory,
            connector,
        }
    }
}

impl<C: Connector> TargetProvider for DeviceProvider<'_, C> {
    type Error = anyhow::Error;

    fn fetch(&mut self, target: &str, baseline: &CompiledBaseline) -> Result<TargetInput> {
        let params = self.inventory.connection_params(target)?;
        info!("Connecting to {target} ({}) ...", params.host);

        let mut session = self
            .connector
            .connect(&params)
            .with_context(|| format!("failed to open session to {target} ({})", params.host))?;
        let collected = collect(session.as_mut(), baseline);
        if let Err(err) = session.disconnect() {
            warn!(device = target, error = %err, "disconnect failed");
        }

        let input = collected.with_context(|| format!("failed to collect output from {target}"))?;
        info!("     Done ...");
        Ok(input)
    }
}

fn collect(
    session: &mut dyn DeviceSession,
    baseline: &CompiledBaseline,
) -> Result<TargetInput, SessionError> {
    let configuration = session.send_command(RUNNING_CONFIG_COMMAND)?;
    let mut show_outputs = IndexMap::new();
    for name in baseline.show_command_names() {
        let output = session.send_command(&format!("show {name}"))?;
        show_outputs.insert(name.to_string(), output);
    }
    let version = session.send_command(VERSION_COMMAND)?;
    Ok(TargetInput::online(configuration, show_outputs, version))
}
