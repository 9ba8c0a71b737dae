use kleinbot_infra::secret::Secrets;
use kleinbot_types::config::KleinConfig;

/// Print the effective configuration and verify required secrets exist.
pub fn run(config: &KleinConfig) -> anyhow::Result<()> {
    println!("{}", toml::to_string_pretty(config)?);

    let secrets = Secrets::from_env()?;
    println!("# secrets set: {}", secrets.present().join(", "));
    Ok(())
}
