use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::marking::{MarkOutcome, MarkingLogic};
use crate::core::ports::CliLocationProvider;
use crate::db::log::rclog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

/// Handle the `checkin` command: geofenced check-in for the current
/// class period. Precondition refusals print a warning and exit 0;
/// platform failures bubble up as errors.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Checkin { lat, lon, accuracy } = &cli.command else {
        return Ok(());
    };

    let clock = super::resolve_clock(cli)?;
    let now = clock.now();

    let mut provider = CliLocationProvider::new(*lat, *lon, *accuracy, now);
    let mut pool = DbPool::new(&cfg.database)?;
    let timetable = cfg.timetable()?;

    let outcome = MarkingLogic::check_in(&mut pool, &timetable, cfg, now, &mut provider)?;

    match outcome {
        MarkOutcome::CheckedIn(rec) => {
            let _ = rclog(
                &pool.conn,
                "checkin",
                &format!("{} {}", rec.date_str(), rec.period_label),
                &format!("Checked in at {} ({})", rec.check_in_str(), rec.status.as_str()),
            );

            success(format!(
                "Checked in for '{}' at {} — {}",
                rec.period_label,
                rec.check_in_str(),
                rec.status.as_str()
            ));
            if let Some(d) = rec.distance_m {
                println!("📍 {:.0} m from the geofence center", d);
            }
        }
        MarkOutcome::Refused { reason } => warning(reason),
        MarkOutcome::CheckedOut(_) => unreachable!("check_in never checks out"),
    }

    Ok(())
}
