use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use log::{debug, error, info};
use rusqlite::Connection;

use masjid::access;
use masjid::config::AppConfig;
use masjid::db::MosqueRepo;
use masjid::models::{
    MosqueRecord, NewMosque, PrayerSlot, Role, SearchFilter, SearchParams, Session, TimeOfDay,
};
use masjid::prayer_times::{compute_window, next_prayer, UpcomingPrayer};
use masjid::query::build_query;
use masjid::utils::format::{
    format_am_pm, format_distance, format_duration_minutes, format_optional,
};
use masjid::utils::hijri::eid_on;
use masjid::MosqueError;

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

/// Storage failures are logged here once; everything else is the caller's
/// mistake and only reported.
fn report(e: MosqueError) -> anyhow::Error {
    if e.is_upstream() {
        error!("Storage collaborator failed: {}", e);
    }
    e.into()
}

fn describe_next(next: &UpcomingPrayer) -> String {
    let when = if next.tomorrow { " tomorrow" } else { "" };
    format!(
        "{} @ {}{} (in {})",
        next.slot.display_name(),
        format_am_pm(next.time),
        when,
        format_duration_minutes(next.minutes_until)
    )
}

fn read_document(path: &Path) -> Result<NewMosque> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
    let doc: NewMosque = serde_json::from_str(&content)
        .with_context(|| format!("Parsing mosque document {:?}", path))?;
    Ok(doc)
}

// ─── Search ──────────────────────────────────────────────────────────────────

pub fn handle_search(
    conn: &Connection,
    config: &AppConfig,
    params: &SearchParams,
    json: bool,
) -> Result<()> {
    let defaults = config.search.defaults()?;
    let search = SearchFilter::from_params(params, &defaults)?;
    debug!("Search params: {}", serde_json::to_string(&search.to_params())?);
    let query = build_query(&search, config.search.page_size);
    let found = MosqueRepo::find(conn, &query).map_err(report)?;
    info!(
        "{} search, page {}: {} mosques",
        search.mode.name(),
        search.page.get(),
        found.len()
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    println!();
    if found.is_empty() {
        println_colored!(DIM, "  No mosques found");
        println!();
        return Ok(());
    }

    let now = Local::now().naive_local();
    let eid = eid_on(now.date(), config.calendar.hijri_offset);
    let near = search.mode.near().map(|g| g.center);

    println_colored!(
        GOLD,
        "  Mosques ({} search, page {})",
        search.mode.name(),
        search.page.get()
    );
    println!();
    for mosque in &found {
        let distance = near
            .map(|c| format!("  {}", format_distance(mosque.coordinates.distance_m(&c))))
            .unwrap_or_default();
        println_colored!(BOLD, "  #{:<4} {}{}", mosque.id, mosque.name, distance);
        println_colored!(DIM, "        {}", mosque.location);
        if let Some(next) = next_prayer(&mosque.prayer_times, now, eid) {
            println_colored!(AMBER, "        Next: {}", describe_next(&next));
        }
    }
    println!();
    Ok(())
}

// ─── Show ────────────────────────────────────────────────────────────────────

pub fn handle_show(conn: &Connection, id: i64, json: bool) -> Result<()> {
    let Some(mosque) = MosqueRepo::find_by_id(conn, id).map_err(report)? else {
        println!("no result");
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&mosque)?);
        return Ok(());
    }

    print_mosque(&mosque);
    Ok(())
}

fn print_mosque(mosque: &MosqueRecord) {
    println!();
    println_colored!(GOLD, "  {} (#{})", mosque.name, mosque.id);
    println_colored!(DIM, "  {}", mosque.location);
    println_colored!(
        DIM,
        "  {:.5}, {:.5}  imam: {}",
        mosque.coordinates.latitude,
        mosque.coordinates.longitude,
        mosque.imam
    );
    if mosque.verified {
        println_colored!(GREEN, "  ✓ Verified");
    } else {
        println_colored!(AMBER, "  Awaiting verification");
    }
    println!();
    println_colored!(BOLD, "  {:<12}  {:<10}  {}", "Prayer", "Azan", "Iqamah");
    for slot in PrayerSlot::all() {
        let iqamah = mosque.prayer_times.get(slot);
        if iqamah.is_none() && !slot.is_mandatory() {
            continue;
        }
        let azan = format_optional(mosque.azan_times.get(&slot).copied());
        println!(
            "  {:<12}  {:<10}  {}",
            slot.display_name(),
            azan,
            format_optional(iqamah)
        );
    }
    if !mosque.photos.is_empty() {
        println!();
        println_colored!(DIM, "  {} photo(s)", mosque.photos.len());
    }
    println!();
}

// ─── Next prayer ─────────────────────────────────────────────────────────────

pub fn handle_next(
    conn: &Connection,
    config: &AppConfig,
    id: i64,
    at: Option<&str>,
    date: Option<&str>,
) -> Result<()> {
    let Some(mosque) = MosqueRepo::find_by_id(conn, id).map_err(report)? else {
        println!("no result");
        return Ok(());
    };

    let now = resolve_moment(at, date)?;
    let eid = eid_on(now.date(), config.calendar.hijri_offset);
    if let Some(slot) = eid {
        debug!("{} is {}", now.date(), slot.display_name());
    }

    match next_prayer(&mosque.prayer_times, now, eid) {
        Some(next) => println_colored!(AMBER, "  {}: {}", mosque.name, describe_next(&next)),
        None => println_colored!(DIM, "  {}: no prayers scheduled", mosque.name),
    }
    Ok(())
}

fn resolve_moment(at: Option<&str>, date: Option<&str>) -> Result<NaiveDateTime> {
    let local = Local::now().naive_local();
    let date = match date {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", d))?,
        None => local.date(),
    };
    let time = match at {
        Some(t) => TimeOfDay::from_str(t)?.to_naive(),
        None => local.time(),
    };
    Ok(date.and_time(time))
}

// ─── Window ──────────────────────────────────────────────────────────────────

pub fn handle_window(config: &AppConfig, time: &str, offset: Option<u32>) -> Result<()> {
    let time = TimeOfDay::from_str(time)?;
    let offset = offset.unwrap_or(config.search.window_minutes);
    let window = compute_window(time, offset);

    print!("  {}", window);
    if window.wraps_midnight() {
        print!("  (crosses midnight)");
    }
    println!();
    Ok(())
}

// ─── Writes ──────────────────────────────────────────────────────────────────

pub fn handle_add(conn: &Connection, session: &Session, file: &Path) -> Result<()> {
    access::can_create(session)?;
    let doc = read_document(file)?;

    // Admins may register on behalf of an imam; everyone else registers as themselves.
    let imam = match (session.role, doc.imam.as_deref()) {
        (Role::Admin, Some(imam)) if !imam.trim().is_empty() => imam.trim().to_string(),
        _ => session.user.clone(),
    };

    let saved = MosqueRepo::insert(conn, &doc, &imam).map_err(report)?;
    info!("Mosque {} registered by {}", saved.id, imam);
    println_colored!(GREEN, "  ✓ Added {} (#{}), awaiting verification", saved.name, saved.id);
    Ok(())
}

pub fn handle_update(conn: &Connection, session: &Session, id: i64, file: &Path) -> Result<()> {
    access::can_update(session, id)?;
    let doc = read_document(file)?;
    let saved = MosqueRepo::update(conn, id, &doc).map_err(report)?;
    info!("Mosque {} updated by {}", id, session.user);
    println_colored!(GREEN, "  ✓ Updated {} (#{})", saved.name, saved.id);
    Ok(())
}

pub fn handle_verify(conn: &Connection, session: &Session, id: i64) -> Result<()> {
    access::can_verify(session)?;
    let saved = MosqueRepo::set_verified(conn, id, true).map_err(report)?;
    info!("Mosque {} verified by {}", id, session.user);
    println_colored!(GREEN, "  ✓ {} (#{}) is verified", saved.name, saved.id);
    Ok(())
}

pub fn handle_reject(conn: &Connection, session: &Session, id: i64) -> Result<()> {
    access::can_reject(session)?;
    let mosque = MosqueRepo::get(conn, id).map_err(report)?;
    if mosque.verified {
        return Err(MosqueError::validation(format!(
            "mosque {} is already verified; use delete instead",
            id
        ))
        .into());
    }
    MosqueRepo::delete(conn, id).map_err(report)?;
    info!("Mosque {} rejected by {}", id, session.user);
    println_colored!(RED, "  ✗ Rejected {} (#{})", mosque.name, id);
    Ok(())
}

pub fn handle_delete(conn: &Connection, session: &Session, id: i64) -> Result<()> {
    access::can_delete(session)?;
    MosqueRepo::delete(conn, id).map_err(report)?;
    info!("Mosque {} deleted by {}", id, session.user);
    println_colored!(RED, "  ✗ Deleted mosque #{}", id);
    Ok(())
}

fn pending_line(mosque: &MosqueRecord) -> String {
    format!(
        "  #{:<4} {}, {} (imam: {})",
        mosque.id, mosque.name, mosque.location, mosque.imam
    )
}

pub fn handle_unverified(conn: &Connection, session: &Session) -> Result<()> {
    access::can_list_unverified(session)?;
    let pending = MosqueRepo::unverified(conn).map_err(report)?;
    let total = MosqueRepo::count(conn).map_err(report)?;
    info!("{} of {} mosques awaiting verification", pending.len(), total);

    println!();
    if pending.is_empty() {
        println_colored!(GREEN, "  ✓ No mosques awaiting verification");
    } else {
        println_colored!(AMBER, "  Awaiting verification ({})", pending.len());
        println!();
        for mosque in &pending {
            println!("{}", pending_line(mosque));
        }
    }
    println!();
    Ok(())
}
