use dns_noise_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;
    Ok(config)
}

/// Logged once the subscriber exists.
pub fn log_config_summary(config_path: Option<&str>, config: &Config) {
    info!(
        config_file = config_path.unwrap_or("default"),
        min_period_ms = config.noise.min_period_ms,
        max_period_ms = config.noise.max_period_ms,
        ipv4 = config.noise.ipv4,
        ipv6 = config.noise.ipv6,
        nameservers = config.nameservers.len(),
        sources = config.sources.len(),
        pihole = config.pihole.is_enabled(),
        database = %config.database.path,
        "Configuration loaded"
    );
}
