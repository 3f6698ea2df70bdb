//! Read-only views: a supervisor's route and a manager's roster.

use fieldroute_core::group_by_day;

/// Print a supervisor's stops, one block per working day.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_route(pool: &sqlx::PgPool, supervisor_id: &str) -> anyhow::Result<()> {
    let stops = fieldroute_db::list_route_stops(pool, supervisor_id).await?;
    if stops.is_empty() {
        println!("no visits planned for supervisor {supervisor_id}");
        return Ok(());
    }

    if let Some(manager) = fieldroute_db::get_manager_of_supervisor(pool, supervisor_id).await? {
        println!("reports to: {} ({})", manager.name, manager.id);
    }

    for day in group_by_day(stops) {
        let mean_tier = day
            .mean_tier()
            .map_or_else(super::dash, |t| format!("{t:.1}"));
        println!();
        println!(
            "{} - {} visit(s), mean tier {}",
            day.weekday,
            day.visit_count(),
            mean_tier
        );
        println!("{:<4}{:<10}{:<6}{:<22}NAME", "#", "STORE", "TIER", "COORDINATES");
        for stop in &day.stops {
            let tier = stop.tier.map_or_else(super::dash, |t| t.to_string());
            let coords = stop.coordinates.map_or_else(super::dash, |c| {
                format!("{:.4},{:.4}", c.latitude, c.longitude)
            });
            println!(
                "{:<4}{:<10}{:<6}{:<22}{}",
                stop.visit_order, stop.store_id, tier, coords, stop.store_name
            );
        }
    }
    Ok(())
}

/// Print the supervisors reporting to a manager with their visit counts.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_roster(pool: &sqlx::PgPool, manager_id: &str) -> anyhow::Result<()> {
    let roster = fieldroute_db::list_supervisors_for_manager(pool, manager_id).await?;
    if roster.is_empty() {
        println!("no supervisors report to manager {manager_id}");
        return Ok(());
    }

    println!("{:<12}{:<24}{:<8}EMAIL", "ID", "NAME", "VISITS");
    for row in &roster {
        let email = row.email.clone().unwrap_or_else(super::dash);
        println!(
            "{:<12}{:<24}{:<8}{}",
            row.supervisor_id, row.name, row.visit_count, email
        );
    }
    Ok(())
}
