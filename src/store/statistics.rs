use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

use crate::error::Result;
use crate::models::YearlyStatistic;

use super::{PageRequest, StatisticsFilter};

/// Derive yearly per-station statistics from every stored observation.
///
/// SQL aggregates skip NULL inputs and yield NULL for groups with no
/// non-missing values, which is exactly the absence rule the stats carry:
/// an average or sum over nothing is absent, not 0.0.
pub fn aggregate_observations(conn: &Connection) -> Result<Vec<YearlyStatistic>> {
    let mut stmt = conn.prepare(
        "SELECT station_id,
                CAST(strftime('%Y', date) AS INTEGER) AS year,
                AVG(max_temp),
                AVG(min_temp),
                SUM(precipitation)
         FROM weather_data
         GROUP BY station_id, year
         ORDER BY station_id, year",
    )?;

    let rows = stmt.query_map([], row_to_statistic)?;

    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

/// Insert or overwrite the statistics row for one station-year.
pub fn upsert_statistic(conn: &Connection, stat: &YearlyStatistic) -> Result<()> {
    conn.execute(
        "INSERT INTO weather_stats
             (station_id, year, avg_max_temp, avg_min_temp, total_precipitation)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (station_id, year) DO UPDATE SET
             avg_max_temp = excluded.avg_max_temp,
             avg_min_temp = excluded.avg_min_temp,
             total_precipitation = excluded.total_precipitation",
        params![
            stat.station_id,
            stat.year,
            stat.avg_max_temp,
            stat.avg_min_temp,
            stat.total_precipitation
        ],
    )?;

    Ok(())
}

/// Page through stored statistics, optionally filtered by station and year.
/// Ordered by (station_id, year) so pages are stable.
pub fn list_statistics(
    conn: &Connection,
    filter: &StatisticsFilter,
    page: &PageRequest,
) -> Result<Vec<YearlyStatistic>> {
    let mut sql = String::from(
        "SELECT station_id, year, avg_max_temp, avg_min_temp, total_precipitation FROM weather_stats",
    );
    let mut clauses: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(ref station_id) = filter.station_id {
        clauses.push("station_id = ?");
        values.push(Value::from(station_id.clone()));
    }

    if let Some(year) = filter.year {
        clauses.push("year = ?");
        values.push(Value::from(i64::from(year)));
    }

    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    sql.push_str(" ORDER BY station_id, year LIMIT ? OFFSET ?");
    values.push(Value::from(page.limit()));
    values.push(Value::from(page.offset()));

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values), row_to_statistic)?;

    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

fn row_to_statistic(row: &Row<'_>) -> rusqlite::Result<YearlyStatistic> {
    Ok(
        YearlyStatistic::new(row.get::<_, String>(0)?, row.get(1)?).with_values(
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
        ),
    )
}
