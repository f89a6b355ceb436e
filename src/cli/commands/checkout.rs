use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::marking::{MarkOutcome, MarkingLogic};
use crate::db::log::rclog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use crate::utils::time::{format_minutes, minutes_between};

/// Handle the `checkout` command: close the current period's record.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let clock = super::resolve_clock(cli)?;
    let now = clock.now();

    let mut pool = DbPool::new(&cfg.database)?;
    let timetable = cfg.timetable()?;

    let outcome = MarkingLogic::check_out(&mut pool, &timetable, cfg, now)?;

    match outcome {
        MarkOutcome::CheckedOut(rec) => {
            let _ = rclog(
                &pool.conn,
                "checkout",
                &format!("{} {}", rec.date_str(), rec.period_label),
                &format!("Checked out at {}", rec.check_out_str()),
            );

            success(format!(
                "Checked out of '{}' at {} (in at {})",
                rec.period_label,
                rec.check_out_str(),
                rec.check_in_str()
            ));

            if let (Some(t_in), Some(t_out)) = (rec.check_in_time, rec.check_out_time) {
                println!(
                    "⏱️  Time in class: {}",
                    format_minutes(minutes_between(t_in, t_out))
                );
            }
        }
        MarkOutcome::Refused { reason } => warning(reason),
        MarkOutcome::CheckedIn(_) => unreachable!("check_out never checks in"),
    }

    Ok(())
}
