use anyhow::Context;

use ix_provision::config::PeeringConfig;
use ix_provision::pipeline::peering;
use ix_provision::session::Outcome;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("failed to read .env");
        }
    }
    ix_provision::init_tracing();

    let cfg = PeeringConfig::load().context("failed to load configuration")?;
    tracing::info!("PeeringDB: {}", cfg.peeringdb_url);
    tracing::info!("Template: {}", cfg.template_path.display());

    match peering::run(&cfg).await.context("peering configuration failed")? {
        Outcome::Committed => tracing::info!("Peering configuration committed"),
        Outcome::Discarded => tracing::info!("Peering configuration discarded"),
    }
    Ok(())
}
