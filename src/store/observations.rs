use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::error::Result;
use crate::models::{DailyReading, Observation};
use crate::utils::constants::ISO_DATE_FORMAT;

use super::{ObservationFilter, PageRequest};

/// Fetch one observation by its (station, date) key.
pub fn find_observation(
    conn: &Connection,
    station_id: &str,
    date: NaiveDate,
) -> Result<Option<Observation>> {
    let observation = conn
        .query_row(
            "SELECT station_id, date, max_temp, min_temp, precipitation
             FROM weather_data
             WHERE station_id = ?1 AND date = ?2",
            params![station_id, date],
            row_to_observation,
        )
        .optional()?;

    Ok(observation)
}

/// Stage a new observation row. Fails with a constraint violation if the
/// (station, date) key already exists.
pub fn insert_observation(
    conn: &Connection,
    station_id: &str,
    reading: &DailyReading,
) -> Result<()> {
    conn.execute(
        "INSERT INTO weather_data (station_id, date, max_temp, min_temp, precipitation)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            station_id,
            reading.date,
            reading.max_temp,
            reading.min_temp,
            reading.precipitation
        ],
    )?;

    Ok(())
}

/// Overwrite the measured fields of an existing observation.
pub fn update_observation(
    conn: &Connection,
    station_id: &str,
    reading: &DailyReading,
) -> Result<()> {
    conn.execute(
        "UPDATE weather_data
         SET max_temp = ?3, min_temp = ?4, precipitation = ?5
         WHERE station_id = ?1 AND date = ?2",
        params![
            station_id,
            reading.date,
            reading.max_temp,
            reading.min_temp,
            reading.precipitation
        ],
    )?;

    Ok(())
}

/// Page through stored observations, optionally filtered by station and
/// exact date. Ordered by (station_id, date) so pages are stable.
pub fn list_observations(
    conn: &Connection,
    filter: &ObservationFilter,
    page: &PageRequest,
) -> Result<Vec<Observation>> {
    let mut sql = String::from(
        "SELECT station_id, date, max_temp, min_temp, precipitation FROM weather_data",
    );
    let mut clauses: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(ref station_id) = filter.station_id {
        clauses.push("station_id = ?");
        values.push(Value::from(station_id.clone()));
    }

    if let Some(date) = filter.date {
        clauses.push("date = ?");
        values.push(Value::from(date.format(ISO_DATE_FORMAT).to_string()));
    }

    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    sql.push_str(" ORDER BY station_id, date LIMIT ? OFFSET ?");
    values.push(Value::from(page.limit()));
    values.push(Value::from(page.offset()));

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values), row_to_observation)?;

    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

fn row_to_observation(row: &Row<'_>) -> rusqlite::Result<Observation> {
    Ok(Observation {
        station_id: row.get(0)?,
        date: row.get(1)?,
        max_temp: row.get(2)?,
        min_temp: row.get(3)?,
        precipitation: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::store::{is_constraint_violation, Store};
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, ISO_DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_insert_and_find() {
        let store = Store::open_in_memory().unwrap();
        let reading = DailyReading::new(date("2022-06-01"), Some(25.0), Some(-5.0), Some(8.7));

        insert_observation(store.connection(), "S1", &reading).unwrap();

        let found = find_observation(store.connection(), "S1", reading.date)
            .unwrap()
            .unwrap();
        assert_eq!(found, Observation::new("S1", &reading));

        // Key is (station, date): same date for another station is absent
        let missing = find_observation(store.connection(), "S2", reading.date).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_update_overwrites_measured_fields() {
        let store = Store::open_in_memory().unwrap();
        let first = DailyReading::new(date("2022-06-01"), Some(20.0), Some(10.0), Some(0.0));
        insert_observation(store.connection(), "S1", &first).unwrap();

        let revised = DailyReading::new(date("2022-06-01"), Some(21.5), None, Some(3.0));
        update_observation(store.connection(), "S1", &revised).unwrap();

        let found = find_observation(store.connection(), "S1", first.date)
            .unwrap()
            .unwrap();
        assert_eq!(found.max_temp, Some(21.5));
        assert_eq!(found.min_temp, None);
        assert_eq!(found.precipitation, Some(3.0));
    }

    #[test]
    fn test_duplicate_insert_is_constraint_violation() {
        let store = Store::open_in_memory().unwrap();
        let reading = DailyReading::new(date("2022-06-01"), Some(25.0), Some(-5.0), Some(8.7));

        insert_observation(store.connection(), "S1", &reading).unwrap();
        let err = insert_observation(store.connection(), "S1", &reading).unwrap_err();

        match err {
            PipelineError::Database(e) => assert!(is_constraint_violation(&e)),
            other => panic!("expected database error, got {:?}", other),
        }
    }

    #[test]
    fn test_list_filters_and_pages() {
        let store = Store::open_in_memory().unwrap();
        for day in 1..=15 {
            let reading = DailyReading::new(
                NaiveDate::from_ymd_opt(2022, 11, day).unwrap(),
                Some(20.0 + day as f64),
                Some(5.0),
                None,
            );
            insert_observation(store.connection(), "S1", &reading).unwrap();
        }
        let other = DailyReading::new(date("2022-11-01"), Some(11.0), Some(1.0), Some(2.0));
        insert_observation(store.connection(), "S2", &other).unwrap();

        // Unfiltered, default page size: first 10 rows in key order
        let page1 = list_observations(
            store.connection(),
            &ObservationFilter::default(),
            &PageRequest::default(),
        )
        .unwrap();
        assert_eq!(page1.len(), 10);
        assert_eq!(page1[0].station_id, "S1");
        assert_eq!(page1[0].date, date("2022-11-01"));

        let page2 = list_observations(
            store.connection(),
            &ObservationFilter::default(),
            &PageRequest::new(2, 10),
        )
        .unwrap();
        assert_eq!(page2.len(), 6);
        assert_eq!(page2.last().unwrap().station_id, "S2");

        // Station and date filters combine
        let filtered = list_observations(
            store.connection(),
            &ObservationFilter {
                station_id: Some("S1".to_string()),
                date: Some(date("2022-11-03")),
            },
            &PageRequest::default(),
        )
        .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].max_temp, Some(23.0));
    }
}
