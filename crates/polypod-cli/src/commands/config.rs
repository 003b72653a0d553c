//! Engine configuration commands.

use clap::{Args, Subcommand};
use polypod_config::paths::config_name_from_path;
use polypod_config::{
    EngineConfig, FACTORY_CONFIG_NAMES, factory_config, list_user_configs, user_configs_dir,
};
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the default configuration as TOML
    Default,

    /// Print a factory configuration as TOML
    Factory {
        /// Factory configuration name
        name: String,
    },

    /// List factory and user configurations
    List,

    /// Check a configuration file
    Validate {
        /// Path to the TOML file
        path: PathBuf,
    },
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Default => print!("{}", EngineConfig::default().to_toml()?),

        ConfigCommand::Factory { name } => {
            let config = factory_config(&name).ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown factory configuration '{}' (available: {})",
                    name,
                    FACTORY_CONFIG_NAMES.join(", ")
                )
            })?;
            print!("{}", config.to_toml()?);
        }

        ConfigCommand::List => {
            println!("Factory configurations:");
            for name in FACTORY_CONFIG_NAMES {
                if let Some(config) = factory_config(name) {
                    println!("  {:12}  {}", name, config.description.unwrap_or_default());
                }
            }
            println!();

            let user = list_user_configs();
            println!("User configurations ({}):", user_configs_dir().display());
            if user.is_empty() {
                println!("  (none)");
            }
            for path in user {
                println!("  {}", config_name_from_path(&path).unwrap_or_default());
            }
        }

        ConfigCommand::Validate { path } => {
            let config = EngineConfig::load(&path)?;
            if let Err(err) = config.validate() {
                println!("{}: invalid", path.display());
                for error in err.errors() {
                    println!("  - {error}");
                }
                anyhow::bail!("{} has {} problem(s)", path.display(), err.errors().len());
            }
            println!("{}: ok ('{}')", path.display(), config.name);
        }
    }

    Ok(())
}
