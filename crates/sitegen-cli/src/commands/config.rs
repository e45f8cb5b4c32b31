//! Configuration inspection commands

use sitegen_core::config::Config;
use sitegen_core::llm::ModelRole;

const REDACTED: &str = "********";

/// Print the effective configuration as TOML
pub fn show(config: &Config) -> anyhow::Result<()> {
    print!("{}", toml::to_string_pretty(&redacted(config))?);
    Ok(())
}

/// Validate the effective configuration
pub fn validate(config: &Config) -> anyhow::Result<()> {
    config.validate()?;
    println!("Configuration is valid");
    println!("Provider: {:?}", config.provider);
    for role in ModelRole::ALL {
        println!("  {}: {}", role, config.models.for_role(role).model);
    }
    println!("Output root: {}", config.output_root.display());
    Ok(())
}

fn redacted(config: &Config) -> Config {
    let mut config = config.clone();
    for role in ModelRole::ALL {
        let model = config.models.for_role_mut(role);
        if model.api_key.is_some() {
            model.api_key = Some(REDACTED.to_string());
        }
    }
    config
}
