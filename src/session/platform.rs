use std::fmt;

/// CLI flavour of the remote device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Candidate configuration, diff and commit
    JuniperJunos,
    /// Changes apply to the running config as they are entered
    CiscoIos,
}

impl Platform {
    pub fn disable_paging(self) -> &'static str {
        match self {
            Platform::JuniperJunos => "set cli screen-length 0",
            Platform::CiscoIos => "terminal length 0",
        }
    }

    pub fn enter_config(self) -> &'static str {
        match self {
            Platform::JuniperJunos => "configure",
            Platform::CiscoIos => "configure terminal",
        }
    }

    pub fn exit_config(self) -> &'static str {
        match self {
            Platform::JuniperJunos => "exit configuration-mode",
            Platform::CiscoIos => "end",
        }
    }

    /// Command listing uncommitted changes
    pub fn show_diff(self) -> Option<&'static str> {
        match self {
            Platform::JuniperJunos => Some("show | compare"),
            Platform::CiscoIos => None,
        }
    }

    /// Command that activates the candidate and leaves config mode
    pub fn commit(self) -> Option<&'static str> {
        match self {
            Platform::JuniperJunos => Some("commit and-quit"),
            Platform::CiscoIos => None,
        }
    }

    /// Commands that throw the candidate away (config mode is left separately)
    pub fn discard(self) -> &'static [&'static str] {
        match self {
            Platform::JuniperJunos => &["rollback 0"],
            Platform::CiscoIos => &[],
        }
    }

    /// True when a prompt line belongs to configuration mode
    pub fn is_config_prompt(self, prompt: &str) -> bool {
        let prompt = prompt.trim_end();
        match self {
            Platform::JuniperJunos => prompt.ends_with('#'),
            Platform::CiscoIos => prompt.ends_with(")#") && prompt.contains("(config"),
        }
    }

    /// First line of device output that reports a failure
    pub fn error_line(self, output: &str) -> Option<&str> {
        output.lines().map(str::trim).find(|line| match self {
            Platform::JuniperJunos => {
                line.starts_with("error:") || line.starts_with("syntax error")
            }
            Platform::CiscoIos => line.starts_with("% "),
        })
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::JuniperJunos => f.write_str("juniper_junos"),
            Platform::CiscoIos => f.write_str("cisco_ios"),
        }
    }
}
