use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{MosqueError, Result};
use crate::models::{Coordinate, MosqueRecord, NewMosque};
use crate::query::{Field, FilterExpression, MosqueQuery, ResultOrder, Scalar};

// ─── Mosque repo ─────────────────────────────────────────────────────────────

const MOSQUE_COLUMNS: &str =
    "id, name, location, imam, longitude, latitude, prayer_times, azan_times, photos, verified";

struct MosqueRow {
    id: i64,
    name: String,
    location: String,
    imam: String,
    longitude: f64,
    latitude: f64,
    prayer_times: String,
    azan_times: String,
    photos: String,
    verified: bool,
}

impl MosqueRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            location: row.get(2)?,
            imam: row.get(3)?,
            longitude: row.get(4)?,
            latitude: row.get(5)?,
            prayer_times: row.get(6)?,
            azan_times: row.get(7)?,
            photos: row.get(8)?,
            verified: row.get::<_, i32>(9)? != 0,
        })
    }

    fn into_record(self) -> Result<MosqueRecord> {
        Ok(MosqueRecord {
            id: self.id,
            name: self.name,
            location: self.location,
            imam: self.imam,
            coordinates: Coordinate::new(self.longitude, self.latitude)?,
            prayer_times: serde_json::from_str(&self.prayer_times)?,
            azan_times: serde_json::from_str(&self.azan_times)?,
            photos: serde_json::from_str(&self.photos)?,
            verified: self.verified,
        })
    }
}

pub struct MosqueRepo;

impl MosqueRepo {
    /// Stores a new, unverified mosque registered by `imam`.
    pub fn insert(conn: &Connection, mosque: &NewMosque, imam: &str) -> Result<MosqueRecord> {
        mosque.validate()?;
        conn.execute(
            "INSERT INTO mosques
                (name, location, imam, longitude, latitude,
                 prayer_times, azan_times, photos, verified)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0)",
            params![
                mosque.name.trim(),
                mosque.location.trim(),
                imam,
                mosque.coordinates.longitude,
                mosque.coordinates.latitude,
                serde_json::to_string(&mosque.prayer_times)?,
                serde_json::to_string(&mosque.azan_times)?,
                serde_json::to_string(&mosque.photos)?,
            ],
        )?;
        Self::get(conn, conn.last_insert_rowid())
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<MosqueRecord>> {
        let row = conn
            .query_row(
                &format!("SELECT {} FROM mosques WHERE id = ?1", MOSQUE_COLUMNS),
                params![id],
                MosqueRow::from_row,
            )
            .optional()?;
        row.map(MosqueRow::into_record).transpose()
    }

    /// Like [`find_by_id`](Self::find_by_id), but a missing record is an error.
    pub fn get(conn: &Connection, id: i64) -> Result<MosqueRecord> {
        Self::find_by_id(conn, id)?.ok_or(MosqueError::NotFound(id))
    }

    /// One page of mosques matching the query, in the requested order.
    pub fn find(conn: &Connection, query: &MosqueQuery) -> Result<Vec<MosqueRecord>> {
        let mut matches = Self::matching(conn, &query.filter)?;

        match query.order {
            ResultOrder::Inserted => {}
            ResultOrder::Name => matches.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then(a.id.cmp(&b.id))
            }),
            ResultOrder::Nearest(center) => matches.sort_by(|a, b| {
                a.coordinates
                    .distance_m(&center)
                    .total_cmp(&b.coordinates.distance_m(&center))
                    .then(a.id.cmp(&b.id))
            }),
        }

        Ok(matches
            .into_iter()
            .skip(query.pagination.skip as usize)
            .take(query.pagination.limit as usize)
            .collect())
    }

    /// Mosques still waiting for an admin's decision, oldest first.
    pub fn unverified(conn: &Connection) -> Result<Vec<MosqueRecord>> {
        let filter = FilterExpression::equals(Field::Verified, Scalar::Bool(false));
        Self::matching(conn, &filter)
    }

    /// Replaces the editable fields; id, imam and verification are kept.
    pub fn update(conn: &Connection, id: i64, mosque: &NewMosque) -> Result<MosqueRecord> {
        mosque.validate()?;
        let changed = conn.execute(
            "UPDATE mosques
             SET name = ?1, location = ?2, longitude = ?3, latitude = ?4,
                 prayer_times = ?5, azan_times = ?6, photos = ?7,
                 updated_at = datetime('now')
             WHERE id = ?8",
            params![
                mosque.name.trim(),
                mosque.location.trim(),
                mosque.coordinates.longitude,
                mosque.coordinates.latitude,
                serde_json::to_string(&mosque.prayer_times)?,
                serde_json::to_string(&mosque.azan_times)?,
                serde_json::to_string(&mosque.photos)?,
                id,
            ],
        )?;
        if changed == 0 {
            return Err(MosqueError::NotFound(id));
        }
        Self::get(conn, id)
    }

    pub fn set_verified(conn: &Connection, id: i64, verified: bool) -> Result<MosqueRecord> {
        let changed = conn.execute(
            "UPDATE mosques SET verified = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![verified as i32, id],
        )?;
        if changed == 0 {
            return Err(MosqueError::NotFound(id));
        }
        Self::get(conn, id)
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<()> {
        let changed = conn.execute("DELETE FROM mosques WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(MosqueError::NotFound(id));
        }
        Ok(())
    }

    pub fn count(conn: &Connection) -> Result<i64> {
        conn.query_row("SELECT COUNT(*) FROM mosques", [], |row| row.get(0))
            .map_err(MosqueError::from)
    }

    fn matching(conn: &Connection, filter: &FilterExpression) -> Result<Vec<MosqueRecord>> {
        let sql = format!("SELECT {} FROM mosques ORDER BY id", MOSQUE_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], MosqueRow::from_row)?;

        let mut result = Vec::new();
        let mut scanned = 0usize;
        for row in rows {
            scanned += 1;
            let record = row?.into_record()?;
            if filter.matches(&record) {
                result.push(record);
            }
        }
        debug!("Scanned {} mosques, {} matched", scanned, result.len());
        Ok(result)
    }
}

// ─── App meta ────────────────────────────────────────────────────────────────

pub struct MetaRepo;

impl MetaRepo {
    pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
        conn.query_row(
            "SELECT value FROM app_meta WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(MosqueError::from)
    }

    pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO app_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::{run_migrations, SCHEMA_VERSION};
    use crate::models::{AzanTimes, PrayerSchedule, PrayerSlot, TimeOfDay};
    use crate::query::{Page, Pagination};

    fn t(h: u8, m: u8) -> TimeOfDay {
        TimeOfDay::new(h, m).unwrap()
    }

    fn open() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn mosque(name: &str, lng: f64, lat: f64) -> NewMosque {
        NewMosque {
            name: name.to_string(),
            location: format!("{} Road", name),
            imam: None,
            coordinates: Coordinate::new(lng, lat).unwrap(),
            prayer_times: PrayerSchedule {
                fajr: t(5, 0),
                zohar: t(13, 0),
                asr: t(16, 30),
                maghrib: t(19, 10),
                isha: t(20, 45),
                juma: None,
                eidulfitr: None,
                eidulazha: None,
            },
            azan_times: AzanTimes::new(),
            photos: vec![],
        }
    }

    fn all(order: ResultOrder, page: u32) -> MosqueQuery {
        MosqueQuery {
            filter: FilterExpression::All,
            pagination: Pagination::new(Page::new(page).unwrap(), 2),
            order,
        }
    }

    #[test]
    fn migrations_are_idempotent() {
        let conn = open();
        run_migrations(&conn).unwrap();
        let version = MetaRepo::get(&conn, "schema_version").unwrap();
        assert_eq!(version.as_deref(), Some(SCHEMA_VERSION));
        assert_eq!(MetaRepo::get(&conn, "missing").unwrap(), None);
    }

    #[test]
    fn insert_round_trips_the_document() {
        let conn = open();
        let mut new = mosque("Central", -0.1552, 51.5287);
        new.prayer_times.juma = Some(t(13, 30));
        new.azan_times.insert(PrayerSlot::Fajr, t(4, 45));
        new.photos = vec!["photos/central-1.jpg".into()];

        let saved = MosqueRepo::insert(&conn, &new, "imam_1").unwrap();
        assert!(!saved.verified);
        assert_eq!(saved.imam, "imam_1");
        assert_eq!(saved.prayer_times, new.prayer_times);
        assert_eq!(saved.azan_times.get(&PrayerSlot::Fajr), Some(&t(4, 45)));
        assert_eq!(saved.photos, new.photos);
        assert_eq!(saved.coordinates, new.coordinates);

        assert_eq!(MosqueRepo::find_by_id(&conn, saved.id).unwrap(), Some(saved));
    }

    #[test]
    fn missing_ids_are_not_found() {
        let conn = open();
        assert_eq!(MosqueRepo::find_by_id(&conn, 99).unwrap(), None);
        assert!(MosqueRepo::get(&conn, 99).unwrap_err().is_not_found());
        assert!(MosqueRepo::delete(&conn, 99).unwrap_err().is_not_found());
        assert!(MosqueRepo::set_verified(&conn, 99, true).unwrap_err().is_not_found());
        assert!(MosqueRepo::update(&conn, 99, &mosque("X", 0.0, 0.0)).unwrap_err().is_not_found());
    }

    #[test]
    fn find_pages_and_orders() {
        let conn = open();
        for (name, lng) in [("Delta", 0.03), ("alpha", 0.01), ("Charlie", 0.04), ("Bravo", 0.02)] {
            MosqueRepo::insert(&conn, &mosque(name, lng, 51.5), "imam").unwrap();
        }

        let names = |q: MosqueQuery| -> Vec<String> {
            MosqueRepo::find(&conn, &q).unwrap().into_iter().map(|m| m.name).collect()
        };

        assert_eq!(names(all(ResultOrder::Inserted, 1)), ["Delta", "alpha"]);
        assert_eq!(names(all(ResultOrder::Inserted, 2)), ["Charlie", "Bravo"]);
        assert!(names(all(ResultOrder::Inserted, 3)).is_empty());
        assert_eq!(names(all(ResultOrder::Name, 1)), ["alpha", "Bravo"]);

        let origin = Coordinate::new(0.0, 51.5).unwrap();
        assert_eq!(names(all(ResultOrder::Nearest(origin), 1)), ["alpha", "Bravo"]);
        assert_eq!(names(all(ResultOrder::Nearest(origin), 2)), ["Delta", "Charlie"]);
    }

    #[test]
    fn find_applies_the_filter_before_paging() {
        let conn = open();
        for name in ["North Masjid", "South Masjid", "Grand Mosque"] {
            MosqueRepo::insert(&conn, &mosque(name, 0.0, 0.0), "imam").unwrap();
        }
        let q = MosqueQuery {
            filter: FilterExpression::Contains { field: Field::Name, needle: "masjid".into() },
            pagination: Pagination::for_page(Page::FIRST),
            order: ResultOrder::Inserted,
        };
        let found = MosqueRepo::find(&conn, &q).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|m| m.name.ends_with("Masjid")));
    }

    #[test]
    fn verification_lifecycle() {
        let conn = open();
        let a = MosqueRepo::insert(&conn, &mosque("A", 0.0, 0.0), "imam_a").unwrap();
        let b = MosqueRepo::insert(&conn, &mosque("B", 0.0, 0.0), "imam_b").unwrap();
        assert_eq!(MosqueRepo::unverified(&conn).unwrap().len(), 2);

        let verified = MosqueRepo::set_verified(&conn, a.id, true).unwrap();
        assert!(verified.verified);
        let pending = MosqueRepo::unverified(&conn).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, b.id);

        MosqueRepo::delete(&conn, b.id).unwrap();
        assert_eq!(MosqueRepo::count(&conn).unwrap(), 1);
    }

    #[test]
    fn update_keeps_identity_and_verification() {
        let conn = open();
        let saved = MosqueRepo::insert(&conn, &mosque("Old", 0.0, 0.0), "imam_1").unwrap();
        MosqueRepo::set_verified(&conn, saved.id, true).unwrap();

        let mut edit = mosque("New Name", 10.0, 20.0);
        edit.imam = Some("someone_else".into());
        edit.prayer_times.eidulfitr = Some(t(7, 30));
        let updated = MosqueRepo::update(&conn, saved.id, &edit).unwrap();

        assert_eq!(updated.id, saved.id);
        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.imam, "imam_1");
        assert!(updated.verified);
        assert_eq!(updated.coordinates.longitude, 10.0);
        assert_eq!(updated.prayer_times.eidulfitr, Some(t(7, 30)));
    }

    #[test]
    fn invalid_documents_are_rejected_before_writing() {
        let conn = open();
        let mut bad = mosque("", 0.0, 0.0);
        bad.name = " ".into();
        assert!(MosqueRepo::insert(&conn, &bad, "imam").unwrap_err().is_validation());
        assert_eq!(MosqueRepo::count(&conn).unwrap(), 0);
    }
}
