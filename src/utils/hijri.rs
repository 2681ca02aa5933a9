use chrono::{Datelike, Duration, NaiveDate};
use hijri_date::HijriDate;
use log::warn;

use crate::models::PrayerSlot;

const SHAWWAL: usize = 10;
const DHU_AL_HIJJAH: usize = 12;

/// Eid prayer held on a given Hijri day, if any.
pub fn eid_for_hijri(month: usize, day: usize) -> Option<PrayerSlot> {
    match (month, day) {
        (SHAWWAL, 1) => Some(PrayerSlot::EidUlFitr),
        (DHU_AL_HIJJAH, 10) => Some(PrayerSlot::EidUlAzha),
        _ => None,
    }
}

/// Eid prayer celebrated on a Gregorian date.
/// `offset_days` shifts the date for local moon sighting
/// (e.g., -1 if your country is one day behind Saudi Arabia).
pub fn eid_on(date: NaiveDate, offset_days: i32) -> Option<PrayerSlot> {
    let adjusted = date + Duration::days(offset_days as i64);

    match HijriDate::from_gr(
        adjusted.year() as usize,
        adjusted.month() as usize,
        adjusted.day() as usize,
    ) {
        Ok(hd) => eid_for_hijri(hd.month(), hd.day()),
        Err(e) => {
            warn!("Hijri conversion failed for {}: {}", adjusted, e);
            None
        }
    }
}
