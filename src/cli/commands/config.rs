use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use std::fs;

/// View or sanity-check the configuration file.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
    } = cmd
    {
        if *print_config {
            let path = Config::config_file();
            if path.exists() {
                println!("{}", fs::read_to_string(&path)?);
            } else {
                warning(format!(
                    "No config file at {} (defaults in effect)",
                    path.display()
                ));
            }
        }

        if *check {
            let findings = cfg.check();
            if findings.is_empty() {
                success("Configuration looks good.");
            } else {
                for f in &findings {
                    warning(f);
                }
            }
        }

        if !*print_config && !*check {
            warning("Nothing to do: specify --print or --check.");
        }
    }

    Ok(())
}
