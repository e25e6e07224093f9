use crate::config::PortConfig;
use crate::error::Result;
use crate::ports::{port_config, read_rows};
use crate::prompt::{Prompter, StdioPrompter};
use crate::render::{RenderedConfig, StanzaTemplate};
use crate::session::{push_ports, DeviceTarget, SshSession};

#[derive(Debug)]
pub struct PortPlan {
    pub target: DeviceTarget,
    pub config: RenderedConfig,
}

/// Render the port sheet and resolve the switch login
pub fn plan(cfg: &PortConfig, prompter: &mut dyn Prompter) -> Result<PortPlan> {
    let template = StanzaTemplate::from_file(&cfg.template_path)?;
    let rows = read_rows(&cfg.source_path)?;
    let config = port_config(&template, &rows)?;

    let password = cfg.ssh.resolve_password(prompter)?;
    let target = cfg.switch_target(password)?;

    Ok(PortPlan { target, config })
}

pub async fn run(cfg: &PortConfig) -> Result<()> {
    let plan = plan(cfg, &mut StdioPrompter)?;

    tokio::task::spawn_blocking(move || {
        let session = SshSession::connect(&plan.target)?;
        push_ports(session, &plan.config, &mut StdioPrompter)
    })
    .await
    .map_err(super::join_error)?
}
