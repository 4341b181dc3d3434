//! Bulk import of known towns.
//!
//! Seeding is insert-if-absent: existing rows keep both their snapshot
//! and their `last_used`, so a re-run never reorders recent locations.

use std::path::Path;

use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::domain::{Coordinate, Located, NewLocation};
use crate::stations::lenient_f64;

use super::error::StoreError;
use super::store::LocationStore;

const INSERT_IF_ABSENT: &str = "
INSERT INTO locations (town, state, zip, lat, lon, station_id, created_at, last_used)
VALUES (?, ?, ?, ?, ?, ?, ?, ?)
ON CONFLICT (town, state) DO NOTHING
";

/// One town as written in a towns JSON file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TownEntry {
    pub town: String,
    pub state: String,
    #[serde(default)]
    pub zip: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub lat: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub lon: f64,
    pub station_id: String,
}

impl TryFrom<TownEntry> for NewLocation {
    type Error = StoreError;

    fn try_from(entry: TownEntry) -> Result<Self, Self::Error> {
        let town = entry.town.clone();
        Coordinate::new(entry.lat, entry.lon)
            .and_then(|pos| NewLocation::new(entry.town, entry.state, entry.zip, pos, entry.station_id))
            .map_err(|source| StoreError::InvalidSeed { town, source })
    }
}

impl LocationStore {
    /// Insert towns that are not already stored.
    ///
    /// Every entry is validated before anything is written, and the inserts
    /// run in one transaction. Returns the number of new rows.
    pub async fn seed(&self, entries: Vec<TownEntry>) -> Result<u64, StoreError> {
        let locations = entries
            .into_iter()
            .map(NewLocation::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let now = Utc::now();
        let mut tx = self.pool().begin().await?;
        let mut inserted = 0;

        for location in &locations {
            let position = location.position();
            let result = sqlx::query(INSERT_IF_ABSENT)
                .bind(location.town())
                .bind(location.state())
                .bind(location.zip())
                .bind(position.lat())
                .bind(position.lon())
                .bind(location.station_id())
                .bind(now)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Read a towns JSON array from disk and [`seed`](Self::seed) it.
    pub async fn seed_file(&self, path: impl AsRef<Path>) -> Result<u64, StoreError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| StoreError::SeedRead {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<TownEntry> =
            serde_json::from_str(&contents).map_err(|source| StoreError::SeedParse {
                path: path.to_path_buf(),
                source,
            })?;

        let total = entries.len();
        let inserted = self.seed(entries).await?;
        info!(path = %path.display(), total, inserted, "seeded towns");
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locations::StoreConfig;
    use tempfile::{TempDir, tempdir};

    async fn open() -> (TempDir, LocationStore) {
        let dir = tempdir().unwrap();
        let config = StoreConfig::new(dir.path().join("locations.db"));
        let store = LocationStore::connect(&config).await.unwrap();
        (dir, store)
    }

    const TOWNS: &str = r#"[
        {"town": "Stamford", "state": "CT", "zip": "06901", "lat": 41.0534, "lon": -73.5387, "stationId": "8467150"},
        {"town": "Mystic", "state": "CT", "zip": "06355", "lat": "41.3543", "lon": "-71.9665", "stationId": "8461490"},
        {"town": "Montauk", "state": "NY", "lat": 41.0359, "lon": -71.9545, "stationId": "8510560"}
    ]"#;

    #[tokio::test]
    async fn seed_file_inserts_all() {
        let (dir, store) = open().await;
        let path = dir.path().join("towns.json");
        std::fs::write(&path, TOWNS).unwrap();

        assert_eq!(store.seed_file(&path).await.unwrap(), 3);
        assert_eq!(store.count().await.unwrap(), 3);

        let montauk = store.search(Some("montauk"), 5).await.unwrap();
        assert_eq!(montauk[0].zip, "");
        assert_eq!(montauk[0].station_id, "8510560");
    }

    #[tokio::test]
    async fn seeding_twice_is_idempotent() {
        let (dir, store) = open().await;
        let path = dir.path().join("towns.json");
        std::fs::write(&path, TOWNS).unwrap();

        store.seed_file(&path).await.unwrap();
        assert_eq!(store.seed_file(&path).await.unwrap(), 0);
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn seed_keeps_existing_rows() {
        let (_dir, store) = open().await;
        let pos = Coordinate::new(41.0, -73.5).unwrap();
        let existing = store
            .upsert(&NewLocation::new("Stamford", "CT", "", pos, "CUSTOM").unwrap())
            .await
            .unwrap();

        let entries: Vec<TownEntry> = serde_json::from_str(TOWNS).unwrap();
        assert_eq!(store.seed(entries).await.unwrap(), 2);

        let stamford = store.search(Some("stamford"), 5).await.unwrap();
        assert_eq!(stamford, vec![existing]);
    }

    #[tokio::test]
    async fn invalid_entry_writes_nothing() {
        let (_dir, store) = open().await;
        let entries: Vec<TownEntry> = serde_json::from_str(
            r#"[
                {"town": "Stamford", "state": "CT", "lat": 41.05, "lon": -73.54, "stationId": "8467150"},
                {"town": "Atlantis", "state": "", "lat": 0, "lon": 0, "stationId": "X"}
            ]"#,
        )
        .unwrap();

        let err = store.seed(entries).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidSeed { ref town, .. } if town == "Atlantis"));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_and_malformed_files() {
        let (dir, store) = open().await;
        let err = store.seed_file(dir.path().join("nope.json")).await.unwrap_err();
        assert!(matches!(err, StoreError::SeedRead { .. }));

        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"town": "Stamford"}"#).unwrap();
        let err = store.seed_file(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::SeedParse { .. }));
    }
}
