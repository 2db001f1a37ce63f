//! The `config` command: inspect or create the configuration file.

use crate::{ConfigArgs, ConfigCommands, InitArgs};
use anyhow::{bail, Result};
use handlecheck_core::AppConfig;
use std::path::Path;

pub(crate) fn handle_config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => {
            let config = AppConfig::load_with_env()?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigCommands::Path => {
            println!("{}", AppConfig::config_path()?.display());
        }
        ConfigCommands::Init(args) => {
            let config_path = AppConfig::config_path()?;
            init_config(&config_path, &args)?;
            println!("Config saved to {}", config_path.display());
        }
    }
    Ok(())
}

/// Write a config file at `path` from defaults plus the given flags.
fn init_config(path: &Path, args: &InitArgs) -> Result<AppConfig> {
    if path.exists() && !args.force {
        bail!(
            "config already exists at {} (pass --force to overwrite)",
            path.display()
        );
    }

    let mut config = AppConfig::default();
    if let Some(concurrency) = args.concurrency {
        config.checker.concurrency = concurrency;
    }
    if let Some(timeout) = args.timeout_secs {
        config.checker.request_timeout_secs = timeout;
    }
    if let Some(dir) = &args.output_dir {
        config.export.output_dir = Some(dir.clone());
    }

    config.validate()?;
    config.save_to(path)?;
    Ok(config)
}
