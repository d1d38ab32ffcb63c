//! Check command - loads configuration and every artifact, then exits

use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Load everything the server would load and report what is servable
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    let registry = crate::create_registry(&config).await?;
    let configured = config.models.len();

    for name in registry.strategies() {
        let kind = registry.resolve(&name)?.kind();
        println!("{:<24} {}", name, kind);
    }

    let disabled = configured.saturating_sub(registry.len());
    info!(
        loaded = registry.len(),
        disabled,
        baseline = %registry.baseline_name(),
        "Artifact check complete"
    );

    if disabled > 0 {
        println!("{} configured strategies failed to load", disabled);
    }

    Ok(())
}
