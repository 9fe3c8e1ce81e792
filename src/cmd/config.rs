//! Configuration view and validation commands: `agency-desk config`.

use anyhow::Result;

use super::super::ConfigCommands;

pub fn cmd_config(
    work_dir: &std::path::Path,
    overrides: &agency_desk::config::CliOverrides,
    command: Option<ConfigCommands>,
) -> Result<()> {
    use agency_desk::config::{DeskConfig, DeskToml, local_config_path};

    let config_path = local_config_path(work_dir);

    match command {
        None | Some(ConfigCommands::Show) => {
            let config = DeskConfig::resolve(work_dir, overrides)?;

            println!();
            println!("Agency Desk Configuration");
            println!("=========================");
            println!();

            match &config.source {
                Some(path) => println!("Config file: {}", path.display()),
                None => {
                    println!("No desk.toml found at {}", config_path.display());
                    println!("Using default configuration.");
                }
            }
            println!();

            let toml = &config.toml;
            println!("[api]");
            println!("  base_url = \"{}\"", toml.api.base_url);
            println!(
                "  token = {}",
                if toml.api.token.is_some() {
                    "\"********\""
                } else {
                    "(not set)"
                }
            );
            println!("  timeout_secs = {}", toml.api.timeout_secs);
            println!();
            println!("[ui]");
            println!("  items_per_page = {}", toml.ui.items_per_page);
            println!("  currency = \"{}\"", toml.ui.currency);
            println!();
            println!("[log]");
            println!("  level = \"{}\"", toml.log.level);
            println!("  json = {}", toml.log.json);
            println!();

            println!("Effective values (with env/CLI overrides):");
            println!("  base_url = \"{}\"", config.base_url);
            println!(
                "  token = {}",
                if config.token.is_some() { "set" } else { "not set" }
            );
            println!("  items_per_page = {}", config.items_per_page());
            println!("  currency = {}", config.currency());
            println!("  log_level = \"{}\"", config.log_level());
            println!();

            if config.source.is_none() {
                println!("Run 'agency-desk config init' to create a desk.toml file.");
                println!();
            }
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            let config = DeskConfig::resolve(work_dir, overrides)?;
            let Some(path) = &config.source else {
                println!("No desk.toml found. Using defaults (valid).");
                return Ok(());
            };

            let warnings = DeskToml::load(path)?.validate();
            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("desk.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            DeskToml::default().save(&config_path)?;

            println!("Created desk.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [api] base_url, token, timeout_secs");
            println!("  - [ui] items_per_page, currency");
            println!("  - [log] level, json");
            println!();
        }
    }

    Ok(())
}
