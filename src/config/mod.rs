use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::exchange::EdgeRouter;
use crate::prompt::Prompter;
use crate::session::{DeviceTarget, Platform, TransportConfig};

pub const DEFAULT_PEERINGDB_URL: &str = "https://www.peeringdb.com";

/// SSH login shared by both pipelines
#[derive(Debug, Clone)]
pub struct SshSettings {
    pub username: String,
    /// None means ask the operator
    pub password: Option<String>,
    pub port: u16,
    pub timeout: Duration,
}

/// Settings for the IX peering pipeline
#[derive(Debug, Clone)]
pub struct PeeringConfig {
    pub ssh: SshSettings,
    pub api_token: String,
    pub peeringdb_url: String,
    pub er1_ams1: Option<String>,
    pub er1_ams2: Option<String>,
    pub template_path: PathBuf,
}

/// Settings for the switch port pipeline
#[derive(Debug, Clone)]
pub struct PortConfig {
    pub ssh: SshSettings,
    pub switch_ip: String,
    pub template_path: PathBuf,
    pub source_path: PathBuf,
}

/// Reads settings through a lookup function; `env::var` in production,
/// a map in tests. Empty values count as unset.
struct EnvReader<F> {
    lookup: F,
    missing: Vec<&'static str>,
}

impl<F: Fn(&str) -> Option<String>> EnvReader<F> {
    fn new(lookup: F) -> Self {
        Self {
            lookup,
            missing: Vec::new(),
        }
    }

    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    fn get_env(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn required(&mut self, key: &'static str) -> String {
        self.optional(key).unwrap_or_else(|| {
            self.missing.push(key);
            String::new()
        })
    }

    fn parsed<T: std::str::FromStr>(&self, key: &str, default: T) -> Result<T> {
        match self.optional(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{} has an invalid value: {}", key, raw))),
            None => Ok(default),
        }
    }

    fn ssh(&mut self) -> Result<SshSettings> {
        let timeout_secs: u64 = self.parsed("SSH_TIMEOUT_SECS", 30)?;
        if timeout_secs == 0 {
            return Err(Error::Config("SSH_TIMEOUT_SECS must be greater than zero".to_string()));
        }

        Ok(SshSettings {
            username: self.required("RADIUS_USER"),
            password: self.optional("RADIUS_PASSWORD"),
            port: self.parsed("SSH_PORT", 22)?,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    fn finish(self) -> Result<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Config(format!(
                "missing required environment variables: {}",
                self.missing.join(", ")
            )))
        }
    }
}

impl PeeringConfig {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut reader = EnvReader::new(lookup);
        let cfg = Self {
            ssh: reader.ssh()?,
            api_token: reader.required("PEERINGDB_API_TOKEN"),
            peeringdb_url: reader.get_env("PEERINGDB_URL", DEFAULT_PEERINGDB_URL),
            er1_ams1: reader.optional("ER1_AMS1"),
            er1_ams2: reader.optional("ER1_AMS2"),
            template_path: reader.get_env("PEERING_TEMPLATE", "peering_template.j2").into(),
        };
        reader.finish()?;
        Ok(cfg)
    }

    pub fn router_address(&self, router: EdgeRouter) -> Result<&str> {
        let addr = match router {
            EdgeRouter::Er1Ams1 => self.er1_ams1.as_deref(),
            EdgeRouter::Er1Ams2 => self.er1_ams2.as_deref(),
        };
        addr.ok_or_else(|| {
            Error::Config(format!(
                "missing required environment variables: {}",
                router.env_key()
            ))
        })
    }

    /// Build the SSH target for the router terminating the chosen exchange
    pub fn router_target(&self, router: EdgeRouter, password: String) -> Result<DeviceTarget> {
        DeviceTarget::new(
            self.router_address(router)?,
            &self.ssh.username,
            password,
            self.ssh.port,
            TransportConfig {
                platform: Platform::JuniperJunos,
                timeout: self.ssh.timeout,
            },
        )
    }
}

impl PortConfig {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut reader = EnvReader::new(lookup);
        let cfg = Self {
            ssh: reader.ssh()?,
            switch_ip: reader.required("SWITCH_IP"),
            template_path: reader.get_env("INTERFACE_TEMPLATE", "interface_temp.j2").into(),
            source_path: reader.get_env("SWITCH_PORTS_CSV", "switch_ports.csv").into(),
        };
        reader.finish()?;
        Ok(cfg)
    }

    pub fn switch_target(&self, password: String) -> Result<DeviceTarget> {
        DeviceTarget::new(
            &self.switch_ip,
            &self.ssh.username,
            password,
            self.ssh.port,
            TransportConfig {
                platform: Platform::CiscoIos,
                timeout: self.ssh.timeout,
            },
        )
    }
}

impl SshSettings {
    /// Password from the environment, or a masked prompt when unset
    pub fn resolve_password(&self, prompter: &mut dyn Prompter) -> Result<String> {
        match &self.password {
            Some(password) => Ok(password.clone()),
            None => Ok(prompter.ask_secret("Enter your password:")?),
        }
    }
}
