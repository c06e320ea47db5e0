//! Config subcommand handlers.

use rota_config::{Config, ConfigError};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = rota_config::load_config()?;
            let toml_str = toml::to_string_pretty(&cfg).map_err(ConfigError::from)?;
            let out = output::render_single(
                &global.output,
                &cfg,
                |_| toml_str.trim_end().to_owned(),
                |_| toml_str.trim_end().to_owned(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&rota_config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            let path = rota_config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let mut cfg = Config::default();
            if let Some(ref server) = global.server {
                cfg.data_source.url.clone_from(server);
            }
            rota_config::base_url(&cfg)?;

            rota_config::save_config_to(&cfg, &path)?;
            if !global.quiet {
                eprintln!("Config written to {}", path.display());
            }
            Ok(())
        }
    }
}
