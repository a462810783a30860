//! Interactive SSH sessions for Cisco-style CLIs.
//!
//! Runs over a PTY shell, the same way an operator would: log in, enter
//! privileged mode, disable paging, then send one command at a time and
//! read until the device prompt comes back.

use std::io::{ErrorKind, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use regex::Regex;
use ssh2::{Channel, Session};
use tracing::debug;

use crate::inventory::ConnectionParams;
use crate::session::{
    clean_output, prompt_base, Connector, DeviceSession, Platform, SessionError,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const ANY_PROMPT: &str = r"(?m)^[\w.\-@/:]{1,64}(?:\([\w.\-]+\))?[>#][ \t]*\z";
const PASSWORD_PROMPT: &str = r"(?i)password:[ \t]*\z";
// Only the tail of the buffer is searched for a prompt.
const PROMPT_WINDOW: usize = 512;

/// Opens [`SshSession`]s.
#[derive(Debug, Clone)]
pub struct SshConnector {
    pub timeout: Duration,
}

impl Default for SshConnector {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Connector for SshConnector {
    fn connect(
        &mut self,
        params: &ConnectionParams,
    ) -> Result<Box<dyn DeviceSession>, SessionError> {
        let platform: Platform = params.device_type.parse()?;
        let session = SshSession::open(params, platform, self.timeout)?;
        Ok(Box::new(session))
    }
}

pub struct SshSession {
    session: Session,
    channel: Channel,
    prompt: Regex,
    timeout: Duration,
}

impl SshSession {
    pub fn open(
        params: &ConnectionParams,
        platform: Platform,
        timeout: Duration,
    ) -> Result<Self, SessionError> {
        let tcp = connect_tcp(&params.host, params.port, timeout)?;
        let mut session = Session::new()?;
        session.set_tcp_stream(tcp);
        session.set_timeout(u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX));
        session.handshake()?;
        session
            .userauth_password(&params.username, &params.password)
            .map_err(|_| SessionError::AuthFailed(params.username.clone()))?;
        if !session.authenticated() {
            return Err(SessionError::AuthFailed(params.username.clone()));
        }

        let mut channel = session.channel_session()?;
        channel.request_pty("vt100", None, Some((511, 24, 0, 0)))?;
        channel.shell()?;

        let mut ssh = Self {
            session,
            channel,
            prompt: Regex::new(ANY_PROMPT)?,
            timeout,
        };
        ssh.write_line("")?;
        let login = ssh.read_until(&Regex::new(ANY_PROMPT)?, "login")?;
        let base = prompt_base(&login).ok_or(SessionError::NoPrompt)?;
        debug!(device = %params.name, prompt = base, "session prompt detected");
        ssh.prompt = Regex::new(&format!(
            r"(?m)^{}(?:\([\w.\-]+\))?[>#][ \t]*\z",
            regex::escape(base)
        ))?;

        if login.trim_end().ends_with('>') {
            ssh.enable(params.secret.as_deref().unwrap_or_default())?;
        }
        ssh.send_command(platform.paging_command())?;
        Ok(ssh)
    }

    fn enable(&mut self, secret: &str) -> Result<(), SessionError> {
        self.write_line("enable")?;
        let password = Regex::new(PASSWORD_PROMPT)?;
        let either = Regex::new(&format!("{}|{}", PASSWORD_PROMPT, self.prompt.as_str()))?;
        let reply = self.read_until(&either, "enable")?;
        let reply = if password.is_match(tail(&reply)) {
            self.write_line(secret)?;
            let prompt = self.prompt.clone();
            self.read_until(&prompt, "enable secret")?
        } else {
            reply
        };
        if reply.trim_end().ends_with('#') {
            Ok(())
        } else {
            Err(SessionError::Enable(
                reply.lines().last().unwrap_or_default().trim().to_string(),
            ))
        }
    }

    fn write_line(&mut self, line: &str) -> Result<(), SessionError> {
        self.channel.write_all(line.as_bytes())?;
        self.channel.write_all(b"\n")?;
        self.channel.flush()?;
        Ok(())
    }

    fn read_until(&mut self, pattern: &Regex, context: &str) -> Result<String, SessionError> {
        let deadline = Instant::now() + self.timeout;
        let mut raw = Vec::new();
        let mut buf = [0u8; 8192];

        loop {
            if pattern.is_match(tail(&String::from_utf8_lossy(&raw))) {
                return Ok(String::from_utf8_lossy(&raw).into_owned());
            }
            if Instant::now() >= deadline {
                return Err(SessionError::Timeout(context.to_string()));
            }
            match self.channel.read(&mut buf) {
                Ok(0) if self.channel.eof() => {
                    return Err(SessionError::Io(ErrorKind::UnexpectedEof.into()));
                }
                Ok(n) => raw.extend_from_slice(&buf[..n]),
                Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
                Err(err) => return Err(err.into()),
            }
        }
    }
}

impl DeviceSession for SshSession {
    fn send_command(&mut self, command: &str) -> Result<String, SessionError> {
        debug!(command, "sending command");
        self.write_line(command)?;
        let prompt = self.prompt.clone();
        let raw = self.read_until(&prompt, command)?;
        Ok(clean_output(&raw, command))
    }

    fn disconnect(&mut self) -> Result<(), SessionError> {
        self.channel.send_eof()?;
        self.channel.close()?;
        self.session.disconnect(None, "audit complete", None)?;
        Ok(())
    }
}

fn connect_tcp(host: &str, port: u16, timeout: Duration) -> Result<TcpStream, SessionError> {
    let addr = format!("{host}:{port}");
    let connect_err = |source| SessionError::Connect {
        addr: addr.clone(),
        source,
    };
    let mut last_err = None;
    for candidate in (host, port).to_socket_addrs().map_err(connect_err)? {
        match TcpStream::connect_timeout(&candidate, timeout) {
            Ok(stream) => return Ok(stream),
            Err(err) => last_err = Some(err),
        }
    }
    Err(connect_err(last_err.unwrap_or_else(|| {
        std::io::Error::new(ErrorKind::NotFound, "host resolved to no addresses")
    })))
}

fn tail(text: &str) -> &str {
    if text.len() <= PROMPT_WINDOW {
        return text;
    }
    let mut start = text.len() - PROMPT_WINDOW;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..]
}
