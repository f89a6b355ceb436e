use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::stats::{current_streak, monthly_rollups, summarize};
use crate::db::pool::DbPool;
use crate::db::queries::load_records;
use crate::errors::AppResult;
use crate::export::parse_range;
use crate::ui::messages::info;
use crate::utils::colors::{CYAN, GREEN, RED, RESET, YELLOW};
use crate::utils::table::Table;

/// Handle the `stats` command: counts, attendance rate, current streak,
/// and per-month rollups. The possible-slot denominator is active
/// periods × working days (Mon–Fri) in the range.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Stats { range } = cmd else {
        return Ok(());
    };

    let mut pool = DbPool::new(&cfg.database)?;
    let timetable = cfg.timetable()?;
    let records = load_records(&pool.conn, &cfg.student_id, None)?;

    if records.is_empty() {
        println!("No attendance records yet.");
        return Ok(());
    }

    // range defaults to the full recorded span
    let (start, end) = match range {
        None => (records[0].date, records[records.len() - 1].date),
        Some(r) if r.eq_ignore_ascii_case("all") => {
            (records[0].date, records[records.len() - 1].date)
        }
        Some(r) => parse_range(r)?,
    };

    let summary = summarize(&records, &timetable, start, end);
    let streak = current_streak(&records);

    info(format!("Attendance for {} ({} to {})", cfg.student_id, start, end));
    println!();
    println!("{}• Present:{} {}{}{}", CYAN, RESET, GREEN, summary.present, RESET);
    println!("{}• Late:{}    {}{}{}", CYAN, RESET, YELLOW, summary.late, RESET);
    println!("{}• Absent:{}  {}{}{}", CYAN, RESET, RED, summary.absent, RESET);
    println!("{}• Possible:{} {}", CYAN, RESET, summary.possible);
    println!("{}• Rate:{}    {:.1}%", CYAN, RESET, summary.rate_pct);
    println!("{}• Streak:{}  {} day(s)", CYAN, RESET, streak);
    println!();

    let rollups = monthly_rollups(&records, &timetable);
    if !rollups.is_empty() {
        let mut table = Table::new(&["month", "present", "late", "rate"]);
        for m in &rollups {
            table.add_row(vec![
                m.month.clone(),
                m.present.to_string(),
                m.late.to_string(),
                format!("{:.1}%", m.rate_pct),
            ]);
        }
        println!("{}", table.render());
    }

    Ok(())
}
