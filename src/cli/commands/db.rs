use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::stats::{check_integrity, print_db_info};
use crate::errors::AppResult;
use crate::ui::messages::{error, success, warning};

/// Handle the `db` command: integrity check and database info.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db { check, info } = cmd {
        let mut pool = DbPool::new(&cfg.database)?;

        if *check {
            let verdict = check_integrity(&mut pool)?;
            if verdict == "ok" {
                success("Database integrity: ok");
            } else {
                error(format!("Database integrity check failed: {verdict}"));
            }
        }

        if *info {
            print_db_info(&mut pool, &cfg.database)?;
        }

        if !*check && !*info {
            warning("Nothing to do: specify --check or --info.");
        }
    }

    Ok(())
}
