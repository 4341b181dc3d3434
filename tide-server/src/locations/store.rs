//! SQLite-backed location store.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Executor, FromRow};
use tracing::debug;

use crate::domain::{Coordinate, Located, LocationRecord, NewLocation};
use crate::stations::rank_by_distance;

use super::error::StoreError;

/// Number of records returned by a search when no limit is given.
pub const DEFAULT_SEARCH_LIMIT: u32 = 5;

/// Upper bound on any search or nearby limit.
pub const MAX_SEARCH_LIMIT: u32 = 50;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS locations (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    town        TEXT NOT NULL,
    state       TEXT NOT NULL,
    zip         TEXT NOT NULL DEFAULT '',
    lat         REAL NOT NULL,
    lon         REAL NOT NULL,
    station_id  TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    last_used   TEXT NOT NULL,
    UNIQUE (town, state)
);
CREATE INDEX IF NOT EXISTS locations_last_used ON locations (last_used DESC);
";

// The unique constraint makes this a single atomic check-and-write: a
// conflicting (town, state) only moves last_used, so concurrent upserts of
// one key can never produce two rows.
const UPSERT: &str = "
INSERT INTO locations (town, state, zip, lat, lon, station_id, created_at, last_used)
VALUES (?, ?, ?, ?, ?, ?, ?, ?)
ON CONFLICT (town, state) DO UPDATE SET last_used = excluded.last_used
RETURNING id, town, state, zip, lat, lon, station_id, created_at, last_used
";

const RECENT: &str = "
SELECT id, town, state, zip, lat, lon, station_id, created_at, last_used
FROM locations
ORDER BY last_used DESC, id DESC
LIMIT ?
";

const MATCHING: &str = "
SELECT id, town, state, zip, lat, lon, station_id, created_at, last_used
FROM locations
WHERE instr(lower(town), ?) > 0
   OR instr(lower(state), ?) > 0
   OR instr(lower(zip), ?) > 0
ORDER BY last_used DESC, id DESC
LIMIT ?
";

const ALL: &str = "
SELECT id, town, state, zip, lat, lon, station_id, created_at, last_used
FROM locations
ORDER BY id
";

/// Configuration for the location store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file (created if missing).
    pub path: PathBuf,
    /// Maximum pooled connections.
    pub max_connections: u32,
}

impl StoreConfig {
    /// Create a config for the given database file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Set the pool size.
    pub fn with_max_connections(mut self, n: u32) -> Self {
        self.max_connections = n;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new("locations.db")
    }
}

/// A stored location with its distance from a query point.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyLocation {
    pub record: LocationRecord,
    pub distance_km: f64,
}

#[derive(Debug, FromRow)]
struct LocationRow {
    id: i64,
    town: String,
    state: String,
    zip: String,
    lat: f64,
    lon: f64,
    station_id: String,
    created_at: DateTime<Utc>,
    last_used: DateTime<Utc>,
}

impl TryFrom<LocationRow> for LocationRecord {
    type Error = StoreError;

    fn try_from(row: LocationRow) -> Result<Self, Self::Error> {
        let position = Coordinate::new(row.lat, row.lon).map_err(|source| StoreError::CorruptRow {
            id: row.id,
            source,
        })?;
        Ok(LocationRecord {
            id: row.id,
            town: row.town,
            state: row.state,
            zip: row.zip,
            position,
            station_id: row.station_id,
            created_at: row.created_at,
            last_used: row.last_used,
        })
    }
}

fn into_records(rows: Vec<LocationRow>) -> Result<Vec<LocationRecord>, StoreError> {
    rows.into_iter().map(LocationRecord::try_from).collect()
}

/// Durable table of remembered locations.
///
/// Cheap to clone; clones share one connection pool. Each operation
/// borrows a connection for its own duration only.
#[derive(Debug, Clone)]
pub struct LocationStore {
    pool: SqlitePool,
}

impl LocationStore {
    /// Open (creating if needed) the database and ensure the schema exists.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    /// Wrap an existing pool, creating the schema if needed.
    pub async fn with_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        pool.execute(SCHEMA).await?;
        Ok(Self { pool })
    }

    /// Remember a location, or mark an existing one as just used.
    ///
    /// Identity is exact (case-sensitive) `(town, state)`. On a match only
    /// `last_used` changes; the first insert's zip, position and station
    /// id are kept. Returns the stored record.
    pub async fn upsert(&self, location: &NewLocation) -> Result<LocationRecord, StoreError> {
        self.upsert_at(location, Utc::now()).await
    }

    /// [`upsert`](Self::upsert) with an explicit timestamp.
    pub async fn upsert_at(
        &self,
        location: &NewLocation,
        now: DateTime<Utc>,
    ) -> Result<LocationRecord, StoreError> {
        let position = location.position();
        let row: LocationRow = sqlx::query_as(UPSERT)
            .bind(location.town())
            .bind(location.state())
            .bind(location.zip())
            .bind(position.lat())
            .bind(position.lon())
            .bind(location.station_id())
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        let record = LocationRecord::try_from(row)?;
        debug!(
            id = record.id,
            town = %record.town,
            state = %record.state,
            station = %record.station_id,
            "upserted location"
        );
        Ok(record)
    }

    /// Most recently used locations, optionally filtered by text.
    ///
    /// A blank or absent query lists everything. Otherwise town, state and
    /// zip are matched by ASCII case-insensitive substring. Results are
    /// always newest `last_used` first, capped at [`MAX_SEARCH_LIMIT`].
    pub async fn search(
        &self,
        query: Option<&str>,
        limit: u32,
    ) -> Result<Vec<LocationRecord>, StoreError> {
        let limit = i64::from(limit.min(MAX_SEARCH_LIMIT));
        let needle = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_ascii_lowercase);

        let rows: Vec<LocationRow> = match needle {
            None => {
                sqlx::query_as(RECENT)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
            }
            Some(needle) => {
                sqlx::query_as(MATCHING)
                    .bind(&needle)
                    .bind(&needle)
                    .bind(&needle)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        into_records(rows)
    }

    /// Stored locations ordered by distance from `point`.
    pub async fn nearby(
        &self,
        point: Coordinate,
        limit: u32,
    ) -> Result<Vec<NearbyLocation>, StoreError> {
        let records = self.all().await?;
        let limit = limit.min(MAX_SEARCH_LIMIT) as usize;

        Ok(rank_by_distance(point, &records, limit)
            .into_iter()
            .map(|r| NearbyLocation {
                record: r.item.clone(),
                distance_km: r.distance_km,
            })
            .collect())
    }

    /// Every stored location in insertion order.
    pub async fn all(&self) -> Result<Vec<LocationRecord>, StoreError> {
        let rows: Vec<LocationRow> = sqlx::query_as(ALL).fetch_all(&self.pool).await?;
        into_records(rows)
    }

    /// Number of stored locations.
    pub async fn count(&self) -> Result<i64, StoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM locations")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub(super) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::{TempDir, tempdir};

    async fn open() -> (TempDir, LocationStore) {
        let dir = tempdir().unwrap();
        let config = StoreConfig::new(dir.path().join("locations.db"));
        let store = LocationStore::connect(&config).await.unwrap();
        (dir, store)
    }

    fn place(town: &str, state: &str, zip: &str, lat: f64, lon: f64, station: &str) -> NewLocation {
        NewLocation::new(town, state, zip, Coordinate::new(lat, lon).unwrap(), station).unwrap()
    }

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[tokio::test]
    async fn insert_then_search() {
        let (_dir, store) = open().await;
        store
            .upsert(&place("Testville", "TS", "00000", 12.3456, -65.4321, "X"))
            .await
            .unwrap();

        let found = store.search(Some("testville"), DEFAULT_SEARCH_LIMIT).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].town, "Testville");
        assert_eq!(found[0].zip, "00000");
        assert_eq!(found[0].station_id, "X");
        assert_eq!(found[0].position.lat(), 12.3456);
        assert_eq!(found[0].position.lon(), -65.4321);
        assert_eq!(found[0].created_at, found[0].last_used);
    }

    #[tokio::test]
    async fn second_upsert_only_touches_last_used() {
        let (_dir, store) = open().await;
        let first_at = t0();
        let second_at = t0() + Duration::minutes(10);

        let first = store
            .upsert_at(&place("Stamford", "CT", "06901", 41.05, -73.54, "S1"), first_at)
            .await
            .unwrap();
        let second = store
            .upsert_at(&place("Stamford", "CT", "06902", 41.10, -73.50, "S2"), second_at)
            .await
            .unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(second.id, first.id);
        assert_eq!(second.zip, "06901");
        assert_eq!(second.position.lat(), 41.05);
        assert_eq!(second.position.lon(), -73.54);
        assert_eq!(second.station_id, "S1");
        assert_eq!(second.created_at, first_at);
        assert_eq!(second.last_used, second_at);

        let stored = store.all().await.unwrap();
        assert_eq!(stored, vec![second]);
    }

    #[tokio::test]
    async fn wall_clock_last_used_never_goes_backwards() {
        let (_dir, store) = open().await;
        let first = store
            .upsert(&place("Stamford", "CT", "", 41.05, -73.54, "S1"))
            .await
            .unwrap();
        let second = store
            .upsert(&place("Stamford", "CT", "", 41.05, -73.54, "S2"))
            .await
            .unwrap();
        assert!(second.last_used >= first.last_used);
        assert_eq!(second.created_at, first.created_at);
    }

    #[tokio::test]
    async fn identity_is_case_sensitive() {
        let (_dir, store) = open().await;
        store
            .upsert_at(&place("Stamford", "CT", "", 41.05, -73.54, "S1"), t0())
            .await
            .unwrap();
        store
            .upsert_at(&place("stamford", "CT", "", 41.05, -73.54, "S1"), t0())
            .await
            .unwrap();

        assert_eq!(store.count().await.unwrap(), 2);
        // Search is case-insensitive, so both show up.
        let found = store.search(Some("STAMFORD"), 10).await.unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn empty_and_missing_query_list_recent() {
        let (_dir, store) = open().await;
        let towns = ["Greenwich", "Darien", "Norwalk", "Westport", "Fairfield", "Milford"];
        for (i, town) in towns.iter().enumerate() {
            store
                .upsert_at(
                    &place(town, "CT", "", 41.0, -73.0, "8467150"),
                    t0() + Duration::minutes(i as i64),
                )
                .await
                .unwrap();
        }

        let none = store.search(None, DEFAULT_SEARCH_LIMIT).await.unwrap();
        let empty = store.search(Some(""), DEFAULT_SEARCH_LIMIT).await.unwrap();
        let blank = store.search(Some("   "), DEFAULT_SEARCH_LIMIT).await.unwrap();

        assert_eq!(none, empty);
        assert_eq!(none, blank);
        let names: Vec<_> = none.iter().map(|r| r.town.as_str()).collect();
        assert_eq!(names, vec!["Milford", "Fairfield", "Westport", "Norwalk", "Darien"]);
    }

    #[tokio::test]
    async fn touch_moves_record_to_front() {
        let (_dir, store) = open().await;
        store
            .upsert_at(&place("Mystic", "CT", "06355", 41.35, -71.96, "8461490"), t0())
            .await
            .unwrap();
        store
            .upsert_at(
                &place("Guilford", "CT", "06437", 41.28, -72.68, "8465705"),
                t0() + Duration::minutes(1),
            )
            .await
            .unwrap();
        store
            .upsert_at(
                &place("Mystic", "CT", "06355", 41.35, -71.96, "8461490"),
                t0() + Duration::minutes(2),
            )
            .await
            .unwrap();

        let recent = store.search(None, 5).await.unwrap();
        let names: Vec<_> = recent.iter().map(|r| r.town.as_str()).collect();
        assert_eq!(names, vec!["Mystic", "Guilford"]);
    }

    #[tokio::test]
    async fn search_matches_state_and_zip() {
        let (_dir, store) = open().await;
        store
            .upsert_at(&place("Newport", "RI", "02840", 41.49, -71.31, "8452660"), t0())
            .await
            .unwrap();
        store
            .upsert_at(
                &place("Stamford", "CT", "06901", 41.05, -73.54, "8467150"),
                t0() + Duration::minutes(1),
            )
            .await
            .unwrap();

        let by_state = store.search(Some("ri"), 5).await.unwrap();
        assert_eq!(by_state.len(), 1);
        assert_eq!(by_state[0].town, "Newport");

        let by_zip = store.search(Some("069"), 5).await.unwrap();
        assert_eq!(by_zip.len(), 1);
        assert_eq!(by_zip[0].town, "Stamford");

        assert!(store.search(Some("boston"), 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_limit_applies() {
        let (_dir, store) = open().await;
        for i in 0..8 {
            store
                .upsert_at(
                    &place(&format!("Town {i}"), "CT", "", 41.0, -73.0, "S"),
                    t0() + Duration::seconds(i),
                )
                .await
                .unwrap();
        }

        assert_eq!(store.search(Some("town"), 3).await.unwrap().len(), 3);
        assert!(store.search(Some("town"), 0).await.unwrap().is_empty());
        assert_eq!(store.search(None, 100).await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn limits_are_capped() {
        let (_dir, store) = open().await;
        for i in 0..60_i32 {
            store
                .upsert_at(
                    &place(&format!("Town {i}"), "CT", "", 41.0, -73.0 + f64::from(i) * 0.01, "S"),
                    t0() + Duration::seconds(i64::from(i)),
                )
                .await
                .unwrap();
        }
        assert_eq!(store.count().await.unwrap(), 60);

        let recent = store.search(None, 100).await.unwrap();
        assert_eq!(recent.len(), MAX_SEARCH_LIMIT as usize);
        assert_eq!(recent[0].town, "Town 59");
        assert_eq!(recent[49].town, "Town 10");

        let matching = store.search(Some("town"), u32::MAX).await.unwrap();
        assert_eq!(matching.len(), MAX_SEARCH_LIMIT as usize);

        let here = Coordinate::new(41.0, -73.0).unwrap();
        assert_eq!(store.nearby(here, 100).await.unwrap().len(), MAX_SEARCH_LIMIT as usize);
    }

    #[tokio::test]
    async fn concurrent_upserts_keep_one_row() {
        let (_dir, store) = open().await;
        let location = place("Stamford", "CT", "06901", 41.05, -73.54, "8467150");

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                let location = location.clone();
                tokio::spawn(async move { store.upsert(&location).await })
            })
            .collect();

        for result in futures::future::join_all(tasks).await {
            result.unwrap().unwrap();
        }

        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn nearby_orders_by_distance() {
        let (_dir, store) = open().await;
        store
            .upsert_at(&place("Boston", "MA", "", 42.36, -71.06, "8443970"), t0())
            .await
            .unwrap();
        store
            .upsert_at(&place("Testville", "TS", "00000", 12.3456, -65.4321, "X"), t0())
            .await
            .unwrap();
        store
            .upsert_at(&place("Stamford", "CT", "", 41.05, -73.54, "8467150"), t0())
            .await
            .unwrap();

        let here = Coordinate::new(12.3456, -65.4321).unwrap();
        let nearby = store.nearby(here, 2).await.unwrap();
        assert_eq!(nearby.len(), 2);
        assert_eq!(nearby[0].record.town, "Testville");
        assert_eq!(nearby[0].distance_km, 0.0);
        assert_eq!(nearby[1].record.town, "Stamford");
    }

    #[tokio::test]
    async fn data_survives_reopen() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::new(dir.path().join("locations.db"));
        {
            let store = LocationStore::connect(&config).await.unwrap();
            store
                .upsert(&place("Old Lyme", "CT", "06371", 41.32, -72.33, "8461490"))
                .await
                .unwrap();
            store.pool().close().await;
        }

        let store = LocationStore::connect(&config).await.unwrap();
        let found = store.search(Some("lyme"), 5).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].zip, "06371");
    }

    #[test]
    fn config_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.path, PathBuf::from("locations.db"));
        assert_eq!(config.max_connections, 5);

        let config = StoreConfig::new("/tmp/x.db").with_max_connections(1);
        assert_eq!(config.max_connections, 1);
    }
}
