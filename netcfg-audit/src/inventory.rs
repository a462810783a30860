//! Device inventory: which devices to audit and how to log in to them.
//!
//! ```yaml
//! global:
//!   username: audit
//!   ask_for_password: true
//! device:
//!   core-sw1:
//!     device_type: cisco_ios
//!     ip: 10.0.0.1
//!     secret: enable-secret
//!   lab-sw9:
//!     device_type: cisco_ios
//!     ip: 10.0.9.1
//!     disable: true
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_SSH_PORT: u16 = 22;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("failed to read inventory file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse inventory YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("device '{0}' is not in the inventory")]
    UnknownDevice(String),
    #[error("no {field} configured for device '{device}' and no global default")]
    MissingCredential { device: String, field: &'static str },
    #[error("failed to read {0} from terminal")]
    Prompt(&'static str, #[source] std::io::Error),
}

/// Credentials shared by every device unless a device overrides them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlobalCredentials {
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub ask_for_username: bool,
    #[serde(default)]
    pub ask_for_password: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceEntry {
    pub device_type: String,
    pub ip: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub secret: Option<String>,
    #[serde(default)]
    pub disable: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Inventory {
    pub global: Option<GlobalCredentials>,
    #[serde(default)]
    pub device: IndexMap<String, DeviceEntry>,
}

/// Everything a connector needs to open one device session.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub name: String,
    pub device_type: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub secret: Option<String>,
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("name", &self.name)
            .field("device_type", &self.device_type)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Source of interactively entered credentials.
pub trait CredentialPrompt {
    fn username(&mut self) -> std::io::Result<String>;
    fn password(&mut self) -> std::io::Result<String>;
}

/// Prompts on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl CredentialPrompt for TerminalPrompt {
    fn username(&mut self) -> std::io::Result<String> {
        dialoguer::Input::<String>::new()
            .with_prompt("Enter global username")
            .interact_text()
            .map_err(std::io::Error::other)
    }

    fn password(&mut self) -> std::io::Result<String> {
        rpassword::prompt_password("Enter global password: ")
    }
}

impl Inventory {
    pub fn parse(yaml: &str) -> Result<Self, InventoryError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: &Path) -> Result<Self, InventoryError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Fill in global credentials flagged `ask_for_*`.
    pub fn resolve_prompts(
        &mut self,
        prompt: &mut dyn CredentialPrompt,
    ) -> Result<(), InventoryError> {
        let Some(global) = self.global.as_mut() else {
            return Ok(());
        };
        if global.ask_for_username {
            global.username = Some(
                prompt
                    .username()
                    .map_err(|err| InventoryError::Prompt("username", err))?,
            );
        }
        if global.ask_for_password {
            global.password = Some(
                prompt
                    .password()
                    .map_err(|err| InventoryError::Prompt("password", err))?,
            );
        }
        Ok(())
    }

    /// Devices to audit, in inventory order.
    pub fn enabled_devices(&self) -> impl Iterator<Item = (&str, &DeviceEntry)> {
        self.device
            .iter()
            .filter(|(_, entry)| !entry.disable)
            .map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn disabled_devices(&self) -> impl Iterator<Item = (&str, &DeviceEntry)> {
        self.device
            .iter()
            .filter(|(_, entry)| entry.disable)
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// Resolve connection parameters. Device credentials win over global
    /// ones.
    pub fn connection_params(&self, name: &str) -> Result<ConnectionParams, InventoryError> {
        let entry = self
            .device
            .get(name)
            .ok_or_else(|| InventoryError::UnknownDevice(name.to_string()))?;
        let global = self.global.as_ref();

        let username = entry
            .username
            .clone()
            .or_else(|| global.and_then(|g| g.username.clone()))
            .ok_or_else(|| missing(name, "username"))?;
        let password = entry
            .password
            .clone()
            .or_else(|| global.and_then(|g| g.password.clone()))
            .ok_or_else(|| missing(name, "password"))?;

        Ok(ConnectionParams {
            name: name.to_string(),
            device_type: entry.device_type.clone(),
            host: entry.ip.clone(),
            port: entry.port.unwrap_or(DEFAULT_SSH_PORT),
            username,
            password,
            secret: entry.secret.clone(),
        })
    }
}

fn missing(device: &str, field: &'static str) -> InventoryError {
    InventoryError::MissingCredential {
        device: device.to_string(),
        field,
    }
}
