use chrono::{Datelike, NaiveDateTime, Weekday};

use crate::models::time::MINUTES_PER_DAY;
use crate::models::{PrayerSchedule, PrayerSlot, TimeOfDay};

/// Weekly day on which Juma replaces the midday prayer.
pub const CONGREGATIONAL_DAY: Weekday = Weekday::Fri;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpcomingPrayer {
    pub slot: PrayerSlot,
    pub time: TimeOfDay,
    pub minutes_until: u32,
    /// All of today's candidates have passed; this is tomorrow's first prayer.
    pub tomorrow: bool,
}

impl UpcomingPrayer {
    fn at(slot: PrayerSlot, time: TimeOfDay, now: TimeOfDay) -> Self {
        let now_m = now.minute_of_day();
        let then_m = time.minute_of_day();
        let tomorrow = then_m <= now_m;
        let minutes_until = if tomorrow {
            MINUTES_PER_DAY - now_m + then_m
        } else {
            then_m - now_m
        };
        Self {
            slot,
            time,
            minutes_until,
            tomorrow,
        }
    }
}

/// Earliest candidate strictly after `now`, or the earliest candidate overall
/// when every one of them has already passed today.
pub fn next_occurring(
    candidates: &[(PrayerSlot, TimeOfDay)],
    now: TimeOfDay,
) -> Option<UpcomingPrayer> {
    let later_today = candidates
        .iter()
        .filter(|(_, t)| *t > now)
        .min_by_key(|(_, t)| *t);

    let (slot, time) = match later_today {
        Some(found) => found,
        None => candidates.iter().min_by_key(|(_, t)| *t)?,
    };
    Some(UpcomingPrayer::at(*slot, *time, now))
}

/// On the congregational day, between Fajr and the Juma time, Juma is next
/// no matter what else the mosque has scheduled in between.
pub fn congregational_override(
    schedule: &PrayerSchedule,
    weekday: Weekday,
    now: TimeOfDay,
) -> Option<UpcomingPrayer> {
    if weekday != CONGREGATIONAL_DAY {
        return None;
    }
    let juma = schedule.juma?;
    if schedule.fajr < now && now < juma {
        Some(UpcomingPrayer::at(PrayerSlot::Juma, juma, now))
    } else {
        None
    }
}

/// Next prayer at a mosque as seen at `now` (local wall-clock time).
///
/// `eid` names the Eid prayer being celebrated on `now`'s date, if any.
pub fn next_prayer(
    schedule: &PrayerSchedule,
    now: NaiveDateTime,
    eid: Option<PrayerSlot>,
) -> Option<UpcomingPrayer> {
    let weekday = now.weekday();
    let time = TimeOfDay::from(now.time());

    if let Some(juma) = congregational_override(schedule, weekday, time) {
        return Some(juma);
    }
    next_occurring(&schedule.candidates_for(weekday, eid), time)
}
