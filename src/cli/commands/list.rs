use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::queries::load_records;
use crate::errors::AppResult;
use crate::export::parse_range;
use crate::utils::table::Table;

/// Handle the `list` command: print attendance records as a table,
/// optionally bounded by a `--range` expression.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::List { range } = cmd else {
        return Ok(());
    };

    let bounds = match range {
        None => None,
        Some(r) if r.eq_ignore_ascii_case("all") => None,
        Some(r) => Some(parse_range(r)?),
    };

    let mut pool = DbPool::new(&cfg.database)?;
    let records = load_records(&pool.conn, &cfg.student_id, bounds)?;

    if records.is_empty() {
        println!("No attendance records found.");
        return Ok(());
    }

    let mut table = Table::new(&["date", "period", "label", "in", "out", "status", "dist_m"]);
    for r in &records {
        table.add_row(vec![
            r.date_str(),
            r.period_str(),
            r.period_label.clone(),
            r.check_in_str(),
            r.check_out_str(),
            r.status.as_str().to_string(),
            r.distance_m
                .map(|d| format!("{:.0}", d))
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }

    println!("{}", table.render());
    println!("{} record(s)", records.len());

    Ok(())
}
