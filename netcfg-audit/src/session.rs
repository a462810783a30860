//! Device session abstraction used by online audits.

use std::str::FromStr;

use thiserror::Error;

use crate::inventory::ConnectionParams;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unsupported device_type '{0}'")]
    UnsupportedPlatform(String),
    #[error("failed to connect to {addr}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("authentication failed for user '{0}'")]
    AuthFailed(String),
    #[error("SSH error: {0}")]
    Ssh(#[from] ssh2::Error),
    #[error("I/O error on device channel: {0}")]
    Io(#[from] std::io::Error),
    #[error("timed out waiting for prompt after '{0}'")]
    Timeout(String),
    #[error("no prompt found in login output")]
    NoPrompt,
    #[error("failed to enter privileged mode: {0}")]
    Enable(String),
    #[error("invalid prompt pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Device families the SSH session knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    CiscoIos,
    CiscoXe,
    CiscoNxos,
    CiscoAsa,
    AristaEos,
}

impl Platform {
    /// Command that turns off `--More--` paging.
    pub fn paging_command(self) -> &'static str {
        match self {
            Self::CiscoAsa => "terminal pager 0",
            Self::CiscoIos | Self::CiscoXe | Self::CiscoNxos | Self::AristaEos => {
                "terminal length 0"
            }
        }
    }
}

impl FromStr for Platform {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cisco_ios" | "cisco_ios_ssh" => Ok(Self::CiscoIos),
            "cisco_xe" => Ok(Self::CiscoXe),
            "cisco_nxos" | "cisco_nxos_ssh" => Ok(Self::CiscoNxos),
            "cisco_asa" | "cisco_asa_ssh" => Ok(Self::CiscoAsa),
            "arista_eos" | "arista_eos_ssh" => Ok(Self::AristaEos),
            _ => Err(SessionError::UnsupportedPlatform(s.to_string())),
        }
    }
}

/// An open, privileged CLI session on one device.
pub trait DeviceSession {
    /// Run one command and return its output without echo or prompt.
    fn send_command(&mut self, command: &str) -> Result<String, SessionError>;

    fn disconnect(&mut self) -> Result<(), SessionError>;
}

/// Opens device sessions.
pub trait Connector {
    fn connect(&mut self, params: &ConnectionParams)
        -> Result<Box<dyn DeviceSession>, SessionError>;
}

/// Hostname part of the last prompt line in `output`, e.g. `SW1` for
/// `SW1>` or `SW1(config)#`.
pub(crate) fn prompt_base(output: &str) -> Option<&str> {
    let line = output
        .lines()
        .map(str::trim)
        .rev()
        .find(|line| !line.is_empty())?;
    let stripped = line.strip_suffix(['>', '#'])?;
    let base = match stripped.find('(') {
        Some(at) => &stripped[..at],
        None => stripped,
    };
    (!base.is_empty()).then_some(base)
}

/// Drop the echoed command line and the trailing prompt from raw channel
/// output.
pub(crate) fn clean_output(raw: &str, command: &str) -> String {
    let text = raw.replace("\r\n", "\n").replace('\r', "");
    let mut lines: Vec<&str> = text.lines().collect();
    if lines
        .first()
        .is_some_and(|line| line.trim_end().ends_with(command.trim()))
    {
        lines.remove(0);
    }
    lines.pop();
    lines.join("\n")
}
