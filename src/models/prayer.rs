use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::MosqueError;
use crate::models::TimeOfDay;

const PRAYER_NAMES: &str = "fajr, zohar, asr, maghrib, isha, juma, eidulfitr, eidulazha";

/// One of the eight named prayer occasions a mosque can publish a time for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerSlot {
    Fajr,
    Zohar,
    Asr,
    Maghrib,
    Isha,
    Juma,
    EidUlFitr,
    EidUlAzha,
}

impl PrayerSlot {
    pub const MANDATORY: [PrayerSlot; 5] = [
        PrayerSlot::Fajr,
        PrayerSlot::Zohar,
        PrayerSlot::Asr,
        PrayerSlot::Maghrib,
        PrayerSlot::Isha,
    ];

    pub fn all() -> Vec<PrayerSlot> {
        vec![
            PrayerSlot::Fajr,
            PrayerSlot::Zohar,
            PrayerSlot::Asr,
            PrayerSlot::Maghrib,
            PrayerSlot::Isha,
            PrayerSlot::Juma,
            PrayerSlot::EidUlFitr,
            PrayerSlot::EidUlAzha,
        ]
    }

    pub fn is_mandatory(&self) -> bool {
        Self::MANDATORY.contains(self)
    }

    /// Key used in stored documents and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerSlot::Fajr => "fajr",
            PrayerSlot::Zohar => "zohar",
            PrayerSlot::Asr => "asr",
            PrayerSlot::Maghrib => "maghrib",
            PrayerSlot::Isha => "isha",
            PrayerSlot::Juma => "juma",
            PrayerSlot::EidUlFitr => "eidulfitr",
            PrayerSlot::EidUlAzha => "eidulazha",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerSlot::Fajr => "Fajr",
            PrayerSlot::Zohar => "Zohar",
            PrayerSlot::Asr => "Asr",
            PrayerSlot::Maghrib => "Maghrib",
            PrayerSlot::Isha => "Isha",
            PrayerSlot::Juma => "Juma",
            PrayerSlot::EidUlFitr => "Eid-ul-Fitr",
            PrayerSlot::EidUlAzha => "Eid-ul-Azha",
        }
    }
}

impl std::fmt::Display for PrayerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PrayerSlot {
    type Err = MosqueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fajr" => Ok(PrayerSlot::Fajr),
            "zohar" | "zuhr" | "dhuhr" => Ok(PrayerSlot::Zohar),
            "asr" => Ok(PrayerSlot::Asr),
            "maghrib" => Ok(PrayerSlot::Maghrib),
            "isha" => Ok(PrayerSlot::Isha),
            "juma" | "jumua" | "jummah" => Ok(PrayerSlot::Juma),
            "eidulfitr" => Ok(PrayerSlot::EidUlFitr),
            "eidulazha" => Ok(PrayerSlot::EidUlAzha),
            _ => Err(MosqueError::validation(format!(
                "unknown prayer '{}', expected one of: {}",
                s,
                PRAYER_NAMES
            ))),
        }
    }
}

/// Iqamah times of a mosque. The five daily prayers are always present; the
/// congregational and Eid slots are only present when the mosque observes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerSchedule {
    pub fajr: TimeOfDay,
    pub zohar: TimeOfDay,
    pub asr: TimeOfDay,
    pub maghrib: TimeOfDay,
    pub isha: TimeOfDay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub juma: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eidulfitr: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eidulazha: Option<TimeOfDay>,
}

impl PrayerSchedule {
    pub fn get(&self, slot: PrayerSlot) -> Option<TimeOfDay> {
        match slot {
            PrayerSlot::Fajr => Some(self.fajr),
            PrayerSlot::Zohar => Some(self.zohar),
            PrayerSlot::Asr => Some(self.asr),
            PrayerSlot::Maghrib => Some(self.maghrib),
            PrayerSlot::Isha => Some(self.isha),
            PrayerSlot::Juma => self.juma,
            PrayerSlot::EidUlFitr => self.eidulfitr,
            PrayerSlot::EidUlAzha => self.eidulazha,
        }
    }

    /// Populated slots in canonical order.
    pub fn entries(&self) -> Vec<(PrayerSlot, TimeOfDay)> {
        PrayerSlot::all()
            .into_iter()
            .filter_map(|slot| self.get(slot).map(|t| (slot, t)))
            .collect()
    }

    /// Prayers held at this mosque on a given day: the daily five, Juma on
    /// Fridays, and the Eid prayer when `eid` names today's festival.
    pub fn candidates_for(
        &self,
        weekday: Weekday,
        eid: Option<PrayerSlot>,
    ) -> Vec<(PrayerSlot, TimeOfDay)> {
        let mut candidates: Vec<(PrayerSlot, TimeOfDay)> = PrayerSlot::MANDATORY
            .iter()
            .filter_map(|slot| self.get(*slot).map(|t| (*slot, t)))
            .collect();

        if weekday == Weekday::Fri {
            if let Some(t) = self.juma {
                candidates.push((PrayerSlot::Juma, t));
            }
        }
        if let Some(slot) = eid {
            if let Some(t) = self.get(slot) {
                candidates.push((slot, t));
            }
        }
        candidates
    }
}

/// Azan times, keyed by slot. Mosques publish these for any subset of slots.
pub type AzanTimes = BTreeMap<PrayerSlot, TimeOfDay>;
