use anyhow::Context;

use ix_provision::config::PortConfig;
use ix_provision::pipeline::ports;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("failed to read .env");
        }
    }
    ix_provision::init_tracing();

    let cfg = PortConfig::load().context("failed to load configuration")?;
    tracing::info!("Switch: {}", cfg.switch_ip);
    tracing::info!("Port sheet: {}", cfg.source_path.display());

    ports::run(&cfg).await.context("switch port configuration failed")?;
    tracing::info!("Switch port configuration sent");
    Ok(())
}
