use crate::config::PeeringConfig;
use crate::error::Result;
use crate::exchange::ExchangePoint;
use crate::peeringdb::{PeerRecord, PeeringDbClient};
use crate::prompt::{read_peer_asn, select_exchange, Prompter, StdioPrompter};
use crate::render::{self, RenderedConfig, StanzaTemplate};
use crate::session::{push_peering, DeviceTarget, Outcome, SshSession};

/// Everything gathered before the router is touched
#[derive(Debug)]
pub struct PeeringPlan {
    pub exchange: ExchangePoint,
    pub peer: PeerRecord,
    pub target: DeviceTarget,
    pub config: RenderedConfig,
}

/// Ask the operator for exchange and peer, look the peer up and render its stanzas
pub async fn plan(cfg: &PeeringConfig, prompter: &mut dyn Prompter) -> Result<PeeringPlan> {
    let template = StanzaTemplate::from_file(&cfg.template_path)?;
    let password = cfg.ssh.resolve_password(prompter)?;

    let exchange = select_exchange(prompter)?;
    let asn = read_peer_asn(prompter)?;
    let target = cfg.router_target(exchange.router(), password)?;

    let client = PeeringDbClient::new(&cfg.peeringdb_url, &cfg.api_token)?;
    let peer = client.lookup_peer(asn, exchange.id()).await?;

    let groups = exchange.bgp_groups();
    let config = render::peering_config(&template, &peer, &groups)?;
    if config.is_empty() {
        tracing::warn!("AS{} has no addresses on {}; nothing will be added", asn, exchange);
    } else {
        tracing::info!(
            "Rendered {} neighbor stanzas for {} on {} (groups {} / {})",
            config.stanzas().len(),
            peer.name,
            exchange,
            groups.ipv4,
            groups.ipv6
        );
    }

    Ok(PeeringPlan {
        exchange,
        peer,
        target,
        config,
    })
}

/// Full interactive run against the real router
pub async fn run(cfg: &PeeringConfig) -> Result<Outcome> {
    let plan = plan(cfg, &mut StdioPrompter).await?;

    tokio::task::spawn_blocking(move || {
        let session = SshSession::connect(&plan.target)?;
        push_peering(session, &plan.config, &mut StdioPrompter)
    })
    .await
    .map_err(super::join_error)?
}
