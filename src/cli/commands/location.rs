use crate::cli::parser::{Commands, LocationAction};
use crate::config::Config;
use crate::db::geofence::{activate_area, delete_area, insert_area, load_areas};
use crate::db::log::rclog;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use crate::utils::table::Table;

/// Geofence area management: add, list, activate, delete.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Location { action } = cmd else {
        return Ok(());
    };

    let mut pool = DbPool::new(&cfg.database)?;

    match action {
        LocationAction::Add {
            name,
            lat,
            lon,
            radius,
            activate,
        } => {
            if !(-90.0..=90.0).contains(lat) {
                return Err(AppError::InvalidCoordinate(format!("latitude {lat}")));
            }
            if !(-180.0..=180.0).contains(lon) {
                return Err(AppError::InvalidCoordinate(format!("longitude {lon}")));
            }
            if *radius <= 0.0 {
                return Err(AppError::InvalidCoordinate(format!("radius {radius} m")));
            }

            let area = insert_area(&mut pool.conn, name, *lat, *lon, *radius, *activate)?;

            let _ = rclog(
                &pool.conn,
                "location",
                &format!("add #{}", area.id),
                &format!("Registered area '{}' ({} m radius)", area.name, area.radius_m),
            );

            success(format!(
                "Registered '{}' (id {}){}",
                area.name,
                area.id,
                if area.active { " — now active" } else { "" }
            ));
        }

        LocationAction::List => {
            let areas = load_areas(&pool.conn)?;

            if areas.is_empty() {
                println!("No geofence areas registered.");
                return Ok(());
            }

            let mut table = Table::new(&["id", "name", "lat", "lon", "radius_m", "active"]);
            for a in &areas {
                table.add_row(vec![
                    a.id.to_string(),
                    a.name.clone(),
                    format!("{:.6}", a.latitude),
                    format!("{:.6}", a.longitude),
                    format!("{:.0}", a.radius_m),
                    if a.active { "yes".to_string() } else { "".to_string() },
                ]);
            }

            println!("{}", table.render());
        }

        LocationAction::Activate { id } => {
            activate_area(&mut pool.conn, *id)?;

            let _ = rclog(
                &pool.conn,
                "location",
                &format!("activate #{id}"),
                "Area activated",
            );

            success(format!("Area {} is now the active geofence.", id));
        }

        LocationAction::Del { id } => {
            delete_area(&mut pool.conn, *id)?;

            let _ = rclog(&pool.conn, "location", &format!("del #{id}"), "Area deleted");

            success(format!("Area {} deleted.", id));
        }
    }

    Ok(())
}
