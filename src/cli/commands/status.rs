use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::schedule::{attendance_window, period_status};
use crate::db::geofence::active_area;
use crate::db::pool::DbPool;
use crate::db::queries::load_records_by_date;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::colors::{
    CYAN, GREEN, GREY, RESET, YELLOW, color_for_optional_field, color_for_status,
};

/// Handle the `status` command: current period, open windows, active
/// geofence, and today's marks. Everything shown is derived fresh from
/// "now"; run it again for an updated view.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let clock = super::resolve_clock(cli)?;
    let now = clock.now();
    let time = now.time();

    let timetable = cfg.timetable()?;
    let status = period_status(&timetable, time);

    info(format!("Status at {}", now.format("%Y-%m-%d %H:%M")));
    println!();

    match status.current {
        Some(p) => {
            println!(
                "{}• Current period:{} {} ({}–{}), {} min remaining",
                CYAN, RESET, p.label, p.start, p.end, status.time_remaining_min
            );

            let w = attendance_window(p, time);
            let yes_no = |b: bool| if b { format!("{GREEN}yes{RESET}") } else { format!("{GREY}no{RESET}") };
            println!(
                "{}• Check-in open:{}  {}",
                CYAN,
                RESET,
                yes_no(w.can_check_in)
            );
            println!(
                "{}• Check-out open:{} {}",
                CYAN,
                RESET,
                yes_no(w.can_check_out)
            );
            if let Some(reason) = w.reason {
                println!("  {}{}{}", YELLOW, reason, RESET);
            }
        }
        None => println!("{}• Current period:{} {}none{}", CYAN, RESET, GREY, RESET),
    }

    match status.next {
        Some(p) => println!(
            "{}• Next period:{}    {} at {} (in {} min)",
            CYAN, RESET, p.label, p.start, status.time_until_next_min
        ),
        None => println!("{}• Next period:{}    {}none today{}", CYAN, RESET, GREY, RESET),
    }

    let mut pool = DbPool::new(&cfg.database)?;

    match active_area(&pool.conn)? {
        Some(area) => println!(
            "{}• Active geofence:{} '{}' ({:.0} m radius)",
            CYAN, RESET, area.name, area.radius_m
        ),
        None => println!(
            "{}• Active geofence:{} {}none registered{}",
            CYAN, RESET, GREY, RESET
        ),
    }

    let today = load_records_by_date(&pool.conn, &cfg.student_id, &now.date_naive())?;
    if today.is_empty() {
        println!("{}• Marks today:{}    {}none{}", CYAN, RESET, GREY, RESET);
    } else {
        println!("{}• Marks today:{}", CYAN, RESET);
        for r in &today {
            let in_s = r.check_in_str();
            let out_s = r.check_out_str();
            println!(
                "    {} — in {}{}{} / out {}{}{} ({}{}{})",
                r.period_label,
                color_for_optional_field(Some(&in_s)),
                in_s,
                RESET,
                color_for_optional_field(Some(&out_s)),
                out_s,
                RESET,
                color_for_status(r.status.as_str()),
                r.status.as_str(),
                RESET
            );
        }
    }

    println!();
    Ok(())
}
