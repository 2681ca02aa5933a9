use chrono::NaiveDate;
use rusqlite::Connection;
use serde_json::json;

use masjid::db::{run_migrations, MosqueRepo};
use masjid::models::{NewMosque, PrayerSlot, SearchDefaults, SearchFilter, SearchParams};
use masjid::prayer_times::next_prayer;
use masjid::query::build_query;

fn time(h: u8, m: u8) -> serde_json::Value {
    json!({ "hours": h, "minutes": m })
}

fn mosque(name: &str, lng: f64, lat: f64, zohar: (u8, u8), juma: Option<(u8, u8)>) -> NewMosque {
    let mut prayer_times = json!({
        "fajr": time(5, 0),
        "zohar": time(zohar.0, zohar.1),
        "asr": time(16, 30),
        "maghrib": time(19, 10),
        "isha": time(20, 45),
    });
    if let Some((h, m)) = juma {
        prayer_times["juma"] = time(h, m);
    }
    serde_json::from_value(json!({
        "name": name,
        "location": format!("{} address", name),
        "coordinates": [lng, lat],
        "prayerTimes": prayer_times,
    }))
    .unwrap()
}

fn open(path: &std::path::Path) -> Connection {
    let conn = Connection::open(path).unwrap();
    run_migrations(&conn).unwrap();
    conn
}

fn seed(conn: &Connection) {
    let docs = [
        mosque("Central Mosque", -0.1552, 51.5287, (13, 0), Some((13, 30))),
        mosque("East London Mosque", -0.0656, 51.5175, (13, 15), None),
        mosque("Grande Mosquée de Paris", 2.3551, 48.8420, (13, 45), Some((13, 30))),
    ];
    for doc in &docs {
        MosqueRepo::insert(conn, doc, "imam").unwrap();
    }
}

fn search(conn: &Connection, params: SearchParams) -> Vec<String> {
    let filter = SearchFilter::from_params(&params, &SearchDefaults::default()).unwrap();
    MosqueRepo::find(conn, &build_query(&filter, 20))
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect()
}

#[test]
fn name_search_is_case_insensitive_substring() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open(&dir.path().join("masjid.db"));
    seed(&conn);

    let found = search(
        &conn,
        SearchParams {
            by: Some("name".into()),
            query: Some("MOSQUE".into()),
            ..Default::default()
        },
    );
    assert_eq!(found, ["Central Mosque", "East London Mosque"]);
}

#[test]
fn coordinates_search_stays_inside_the_radius_nearest_first() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open(&dir.path().join("masjid.db"));
    seed(&conn);

    let found = search(
        &conn,
        SearchParams {
            by: Some("coordinates".into()),
            lat: Some(51.5072),
            lng: Some(-0.1276),
            radius: Some(10_000.0),
            ..Default::default()
        },
    );
    assert_eq!(found, ["Central Mosque", "East London Mosque"]);

    let narrow = search(
        &conn,
        SearchParams {
            lat: Some(51.5072),
            lng: Some(-0.1276),
            radius: Some(3_500.0),
            ..Default::default()
        },
    );
    assert_eq!(narrow, ["Central Mosque"]);
}

#[test]
fn prayer_time_search_skips_mosques_without_the_slot() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open(&dir.path().join("masjid.db"));
    seed(&conn);

    let juma = search(
        &conn,
        SearchParams {
            by: Some("prayerTime".into()),
            query: Some("juma".into()),
            prayer_time: Some("13:30".into()),
            ..Default::default()
        },
    );
    assert_eq!(juma, ["Central Mosque", "Grande Mosquée de Paris"]);

    let zohar = search(
        &conn,
        SearchParams {
            by: Some("prayerTime".into()),
            query: Some("zohar".into()),
            time_start: Some("13:10".into()),
            time_end: Some("13:20".into()),
            ..Default::default()
        },
    );
    assert_eq!(zohar, ["East London Mosque"]);
}

#[test]
fn browsing_pages_through_everything_and_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("masjid.db");
    {
        let conn = open(&path);
        seed(&conn);
        for i in 0..25 {
            let doc = mosque(&format!("Masjid {:02}", i), 0.0, 0.0, (13, 0), None);
            MosqueRepo::insert(&conn, &doc, "imam").unwrap();
        }
    }

    let conn = open(&path);
    let page = |n: i64| {
        search(
            &conn,
            SearchParams {
                page: Some(n),
                ..Default::default()
            },
        )
    };

    assert_eq!(page(1).len(), 20);
    assert_eq!(page(1)[0], "Central Mosque");
    let second = page(2);
    assert_eq!(second.len(), 8);
    assert_eq!(second.last().map(String::as_str), Some("Masjid 24"));
    assert!(page(3).is_empty());
    assert!(page(i64::MAX).is_empty());
    // Invalid pages fall back to the first.
    assert_eq!(page(0), page(1));
}

#[test]
fn stored_schedule_drives_next_prayer() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open(&dir.path().join("masjid.db"));
    seed(&conn);

    let central = MosqueRepo::get(&conn, 1).unwrap();
    let friday_morning = NaiveDate::from_ymd_opt(2025, 3, 14)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let next = next_prayer(&central.prayer_times, friday_morning, None).unwrap();
    assert_eq!(next.slot, PrayerSlot::Juma);
    assert_eq!(next.minutes_until, 270);

    let thursday_night = NaiveDate::from_ymd_opt(2025, 3, 13)
        .unwrap()
        .and_hms_opt(22, 0, 0)
        .unwrap();
    let next = next_prayer(&central.prayer_times, thursday_night, None).unwrap();
    assert_eq!(next.slot, PrayerSlot::Fajr);
    assert!(next.tomorrow);
}
