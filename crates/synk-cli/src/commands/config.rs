use std::path::Path;

use crate::cli::ConfigCommands;
use crate::config::{default_config_path, CliConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, db_path: &Path) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => run_config_show(db_path),
        ConfigCommands::SetRemote { url, token } => {
            let mut config = CliConfig::load()?;
            config.set_remote(&url, token)?;
            let path = config.save()?;
            println!("Saved remote {url} to {}", path.display());
            Ok(())
        }
        ConfigCommands::Clear => {
            let path = CliConfig::default().save()?;
            println!("Cleared remote configuration in {}", path.display());
            Ok(())
        }
    }
}

fn run_config_show(db_path: &Path) -> Result<(), CliError> {
    let config = CliConfig::load()?;
    for line in config_lines(&config, &default_config_path()?, db_path) {
        println!("{line}");
    }
    Ok(())
}

pub fn config_lines(config: &CliConfig, config_path: &Path, db_path: &Path) -> Vec<String> {
    vec![
        format!("Config file: {}", config_path.display()),
        format!("Database:    {}", db_path.display()),
        format!(
            "Remote URL:  {}",
            config.remote_url.as_deref().unwrap_or("(not configured)")
        ),
        format!(
            "Auth token:  {}",
            if config.auth_token.is_some() {
                "set"
            } else {
                "not set"
            }
        ),
    ]
}
