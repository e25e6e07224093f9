use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use regex_lite::Regex;

use super::{DeviceSession, DeviceTarget, Platform};
use crate::error::{Error, Result};

/// Matches `user@router> `, `user@router# `, `switch#`, `switch(config-if)#`
const PROMPT_PATTERN: &str = r"^[\w.\-@()/:]+[>#]\s?$";

/// Keyboard-interactive prompt handler that always responds with the password
struct PasswordPrompt {
    password: String,
}

impl ssh2::KeyboardInteractivePrompt for PasswordPrompt {
    fn prompt<'a>(
        &mut self,
        _username: &str,
        _instructions: &str,
        prompts: &[ssh2::Prompt<'a>],
    ) -> Vec<String> {
        prompts.iter().map(|_| self.password.clone()).collect()
    }
}

/// Line-oriented CLI over any byte channel: write a command, read to the next prompt
pub(crate) struct CliShell<C> {
    channel: C,
    platform: Platform,
    prompt: Regex,
    host: String,
}

impl<C: Read + Write> CliShell<C> {
    pub(crate) fn new(channel: C, platform: Platform, host: &str) -> Result<Self> {
        let prompt = Regex::new(PROMPT_PATTERN)
            .map_err(|e| Error::Session(format!("invalid prompt pattern: {}", e)))?;
        Ok(Self {
            channel,
            platform,
            prompt,
            host: host.to_string(),
        })
    }

    /// Send one line and return everything up to the next prompt
    pub(crate) fn send_command(&mut self, command: &str) -> Result<String> {
        tracing::debug!("{} <- {}", self.host, command);
        self.channel
            .write_all(format!("{}\n", command).as_bytes())
            .and_then(|_| self.channel.flush())
            .map_err(|e| Error::Session(format!("write to {} failed: {}", self.host, e)))?;
        self.read_until_prompt()
    }

    pub(crate) fn read_until_prompt(&mut self) -> Result<String> {
        let mut output: Vec<u8> = Vec::new();
        let mut buf = [0u8; 4096];

        loop {
            let n = self.channel.read(&mut buf).map_err(|e| {
                Error::Session(format!("waiting for prompt from {}: {}", self.host, e))
            })?;
            if n == 0 {
                return Err(Error::Session(format!("{} closed the channel", self.host)));
            }
            output.extend_from_slice(&buf[..n]);

            if at_prompt(&output, &self.prompt) {
                return Ok(String::from_utf8_lossy(&output).replace("\r\n", "\n"));
            }
        }
    }

    fn check(&self, output: &str, action: &str) -> Result<()> {
        match self.platform.error_line(output) {
            Some(line) => Err(Error::DeviceState(format!("{} on {}: {}", action, self.host, line))),
            None => Ok(()),
        }
    }

    fn enter_config_mode(&mut self) -> Result<String> {
        let output = self.send_command(self.platform.enter_config())?;
        self.check(&output, "entering configuration mode")?;

        if !self.platform.is_config_prompt(last_line(&output)) {
            return Err(Error::DeviceState(format!(
                "{} did not enter configuration mode",
                self.host
            )));
        }
        Ok(output)
    }

    fn send_config_set(&mut self, commands: &[String]) -> Result<String> {
        let mut output = String::new();
        for command in commands {
            output.push_str(&self.send_command(command)?);
        }
        if let Some(line) = self.platform.error_line(&output) {
            tracing::warn!("{} reported an error while loading configuration: {}", self.host, line);
        }
        Ok(output)
    }

    fn pending_diff(&mut self) -> Result<String> {
        let command = self.platform.show_diff().ok_or_else(|| {
            Error::DeviceState(format!(
                "{} has no candidate configuration to compare",
                self.platform
            ))
        })?;
        self.send_command(command)
    }

    fn commit(&mut self) -> Result<String> {
        let command = self.platform.commit().ok_or_else(|| {
            Error::DeviceState(format!(
                "{} has no candidate configuration to commit",
                self.platform
            ))
        })?;
        let output = self.send_command(command)?;
        self.check(&output, "commit")?;
        Ok(output)
    }

    fn discard(&mut self) -> Result<String> {
        let mut output = String::new();
        for command in self.platform.discard() {
            output.push_str(&self.send_command(command)?);
        }
        output.push_str(&self.exit_config_mode()?);
        Ok(output)
    }

    fn exit_config_mode(&mut self) -> Result<String> {
        self.send_command(self.platform.exit_config())
    }
}

/// True once the last line of the buffered output is a CLI prompt.
/// The buffer may end mid-line; a partial prompt does not match.
fn at_prompt(output: &[u8], prompt: &Regex) -> bool {
    let tail = match output.iter().rposition(|b| *b == b'\n') {
        Some(pos) => &output[pos + 1..],
        None => output,
    };
    let tail = String::from_utf8_lossy(tail);
    prompt.is_match(tail.trim_end_matches('\r'))
}

fn last_line(output: &str) -> &str {
    output.rsplit('\n').next().unwrap_or("")
}

/// Interactive shell on a PTY, driven line by line.
/// Blocking, so run it from a spawn_blocking context.
pub struct SshSession {
    session: ssh2::Session,
    shell: CliShell<ssh2::Channel>,
    closed: bool,
}

impl SshSession {
    /// Connect, authenticate and open a shell with paging disabled
    pub fn connect(target: &DeviceTarget) -> Result<Self> {
        let transport = target.transport();
        tracing::info!(
            "Connecting to {}:{} ({}) as {}",
            target.host(),
            target.port(),
            transport.platform,
            target.username()
        );

        let tcp = tcp_connect(target.host(), target.port(), transport.timeout)?;

        let mut session = ssh2::Session::new()
            .map_err(|e| Error::Connection(format!("Failed to create SSH session: {}", e)))?;
        session.set_tcp_stream(tcp);
        session.set_timeout(transport.timeout.as_millis().min(u32::MAX as u128) as u32);
        session
            .handshake()
            .map_err(|e| Error::Connection(format!("SSH handshake failed: {}", e)))?;

        authenticate(&session, target.username(), target.password())?;

        let mut channel = session
            .channel_session()
            .map_err(|e| Error::Connection(format!("Failed to open channel: {}", e)))?;
        channel
            .request_pty("vt100", None, Some((511, 24, 0, 0)))
            .map_err(|e| Error::Connection(format!("PTY request failed: {}", e)))?;
        channel
            .shell()
            .map_err(|e| Error::Connection(format!("Failed to start shell: {}", e)))?;

        let mut ssh = Self {
            session,
            shell: CliShell::new(channel, transport.platform, target.host())?,
            closed: false,
        };

        let banner = ssh.shell.read_until_prompt()?;
        tracing::debug!("Login banner from {}: {}", target.host(), banner.trim());
        ssh.send_command(transport.platform.disable_paging())?;
        tracing::info!("Session established with {}", target.host());

        Ok(ssh)
    }

    /// Send one line and return everything up to the next prompt
    pub fn send_command(&mut self, command: &str) -> Result<String> {
        self.shell.send_command(command)
    }
}

impl DeviceSession for SshSession {
    fn enter_config_mode(&mut self) -> Result<String> {
        self.shell.enter_config_mode()
    }

    fn send_config_set(&mut self, commands: &[String]) -> Result<String> {
        self.shell.send_config_set(commands)
    }

    fn pending_diff(&mut self) -> Result<String> {
        self.shell.pending_diff()
    }

    fn commit(&mut self) -> Result<String> {
        self.shell.commit()
    }

    fn discard(&mut self) -> Result<String> {
        self.shell.discard()
    }

    fn exit_config_mode(&mut self) -> Result<String> {
        self.shell.exit_config_mode()
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        let _ = self.shell.channel.send_eof();
        let _ = self.shell.channel.close();
        if let Err(e) = self.session.disconnect(None, "session closed", None) {
            tracing::debug!("Disconnect from {} failed: {}", self.shell.host, e);
        }
        tracing::info!("Session with {} closed", self.shell.host);
    }
}

impl Drop for SshSession {
    fn drop(&mut self) {
        self.close();
    }
}

fn tcp_connect(host: &str, port: u16, timeout: Duration) -> Result<TcpStream> {
    let addrs = (host, port)
        .to_socket_addrs()
        .map_err(|e| Error::Connection(format!("Invalid address {}:{}: {}", host, port, e)))?;

    let mut last_err = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(tcp) => return Ok(tcp),
            Err(e) => last_err = Some(e),
        }
    }

    Err(Error::Connection(match last_err {
        Some(e) => format!("TCP connection to {}:{} failed: {}", host, port, e),
        None => format!("{} did not resolve to any address", host),
    }))
}

/// Password auth first, then keyboard-interactive (RADIUS-backed logins often need it)
fn authenticate(session: &ssh2::Session, user: &str, pass: &str) -> Result<()> {
    match session.userauth_password(user, pass) {
        Ok(_) if session.authenticated() => return Ok(()),
        _ => {}
    }

    let mut prompter = PasswordPrompt {
        password: pass.to_string(),
    };
    let _ = session.userauth_keyboard_interactive(user, &mut prompter);

    if session.authenticated() {
        Ok(())
    } else {
        Err(Error::Connection(
            "SSH authentication failed: all methods exhausted".to_string(),
        ))
    }
}
