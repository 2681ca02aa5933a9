use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{MosqueError, Result};
use crate::models::{Coordinate, PrayerSlot, TimeOfDay};
use crate::prayer_times::{compute_window, TimeWindow, DEFAULT_WINDOW_MINUTES};
use crate::query::Page;

pub const DEFAULT_RADIUS_M: f64 = 5000.0;

// ─── Validated building blocks ──────────────────────────────────────────────

/// Non-empty, trimmed free text for substring searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchText(String);

impl SearchText {
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(MosqueError::validation("search query must not be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoConstraint {
    pub center: Coordinate,
    pub radius_m: f64,
}

impl GeoConstraint {
    pub fn new(center: Coordinate, radius_m: f64) -> Result<Self> {
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(MosqueError::validation(format!(
                "radius must be a positive number of meters, got {}",
                radius_m
            )));
        }
        Ok(Self { center, radius_m })
    }
}

/// Text constraint that may accompany a coordinates search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeQuery {
    Name(SearchText),
    Location(SearchText),
}

impl AttributeQuery {
    fn kind(&self) -> &'static str {
        match self {
            AttributeQuery::Name(_) => "name",
            AttributeQuery::Location(_) => "location",
        }
    }

    fn text(&self) -> &SearchText {
        match self {
            AttributeQuery::Name(q) | AttributeQuery::Location(q) => q,
        }
    }
}

/// How the prayer-time window was asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRequest {
    /// A single time, widened by `offset_minutes`.
    At { time: TimeOfDay, offset_minutes: u32 },
    Between(TimeWindow),
}

impl TimeRequest {
    pub fn window(&self) -> TimeWindow {
        match self {
            TimeRequest::At { time, offset_minutes } => compute_window(*time, *offset_minutes),
            TimeRequest::Between(window) => *window,
        }
    }
}

// ─── Search modes ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum SearchMode {
    /// No constraint at all; lists every mosque page by page.
    Browse,
    Name {
        query: SearchText,
        near: Option<GeoConstraint>,
    },
    Location {
        query: SearchText,
        near: Option<GeoConstraint>,
    },
    Coordinates {
        near: GeoConstraint,
        attribute: Option<AttributeQuery>,
    },
    PrayerTime {
        slot: PrayerSlot,
        time: TimeRequest,
        near: Option<GeoConstraint>,
    },
}

impl SearchMode {
    /// Wire name of the mode (`by` parameter).
    pub fn name(&self) -> &'static str {
        match self {
            SearchMode::Browse => "browse",
            SearchMode::Name { .. } => "name",
            SearchMode::Location { .. } => "location",
            SearchMode::Coordinates { .. } => "coordinates",
            SearchMode::PrayerTime { .. } => "prayerTime",
        }
    }

    pub fn near(&self) -> Option<&GeoConstraint> {
        match self {
            SearchMode::Browse => None,
            SearchMode::Coordinates { near, .. } => Some(near),
            SearchMode::Name { near, .. }
            | SearchMode::Location { near, .. }
            | SearchMode::PrayerTime { near, .. } => near.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest record first.
    Inserted,
    Name,
    /// Nearest to the search point first.
    Distance,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Inserted => "inserted",
            SortOrder::Name => "name",
            SortOrder::Distance => "distance",
        }
    }

    pub fn default_for(mode: &SearchMode) -> Self {
        if mode.near().is_some() {
            SortOrder::Distance
        } else {
            SortOrder::Inserted
        }
    }
}

impl FromStr for SortOrder {
    type Err = MosqueError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "inserted" => Ok(SortOrder::Inserted),
            "name" => Ok(SortOrder::Name),
            "distance" => Ok(SortOrder::Distance),
            _ => Err(MosqueError::validation(format!(
                "unknown sort '{}', expected inserted, name or distance",
                s
            ))),
        }
    }
}

/// A fully validated search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilter {
    pub mode: SearchMode,
    pub page: Page,
    pub sort: SortOrder,
}

impl SearchFilter {
    pub fn new(mode: SearchMode) -> Self {
        let sort = SortOrder::default_for(&mode);
        Self {
            mode,
            page: Page::FIRST,
            sort,
        }
    }

    pub fn with_page(mut self, page: Page) -> Self {
        self.page = page;
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Result<Self> {
        if sort == SortOrder::Distance && self.mode.near().is_none() {
            return Err(MosqueError::validation(
                "sorting by distance requires lat and lng",
            ));
        }
        self.sort = sort;
        Ok(self)
    }
}

// ─── Wire form ──────────────────────────────────────────────────────────────

/// Values substituted for parameters the caller left out.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchDefaults {
    pub radius_m: f64,
    pub window_minutes: u32,
    /// Time injected into a prayer-time search that names no time. `None`
    /// rejects such a search instead.
    pub prayer_time: Option<TimeOfDay>,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_RADIUS_M,
            window_minutes: DEFAULT_WINDOW_MINUTES,
            prayer_time: None,
        }
    }
}

/// Search request as it arrives from a query string or the command line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prayer_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl SearchFilter {
    pub fn from_params(params: &SearchParams, defaults: &SearchDefaults) -> Result<Self> {
        let near = geo_constraint(params, defaults)?;
        let query = params
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty());

        let by = params.by.as_deref().map(str::trim).filter(|b| !b.is_empty());
        if params.attribute.is_some() && by != Some("coordinates") {
            return Err(MosqueError::validation(
                "attribute only applies to coordinates searches",
            ));
        }
        if by != Some("prayerTime")
            && (params.prayer_time.is_some()
                || params.time_start.is_some()
                || params.time_end.is_some())
        {
            return Err(MosqueError::validation(
                "prayer times only apply to prayerTime searches",
            ));
        }

        let mode = match by {
            None => match (near, query) {
                (_, Some(_)) => {
                    return Err(MosqueError::validation(
                        "query needs a search mode (by=name, location, coordinates or prayerTime)",
                    ));
                }
                (Some(near), None) => SearchMode::Coordinates {
                    near,
                    attribute: None,
                },
                (None, None) => SearchMode::Browse,
            },
            Some("name") => SearchMode::Name {
                query: SearchText::new(query.unwrap_or_default())?,
                near,
            },
            Some("location") => SearchMode::Location {
                query: SearchText::new(query.unwrap_or_default())?,
                near,
            },
            Some("coordinates") => {
                let near = near.ok_or_else(|| {
                    MosqueError::validation("coordinates search requires lat and lng")
                })?;
                let attribute = match (params.attribute.as_deref().map(str::trim), query) {
                    (None, None) => None,
                    (None | Some("name"), q) => {
                        Some(AttributeQuery::Name(SearchText::new(q.unwrap_or_default())?))
                    }
                    (Some("location"), q) => {
                        Some(AttributeQuery::Location(SearchText::new(q.unwrap_or_default())?))
                    }
                    (Some(other), _) => {
                        return Err(MosqueError::validation(format!(
                            "unknown attribute '{}', expected name or location",
                            other
                        )));
                    }
                };
                SearchMode::Coordinates { near, attribute }
            }
            Some("prayerTime") => {
                let slot = query
                    .ok_or_else(|| {
                        MosqueError::validation("prayerTime search requires a prayer name in query")
                    })?
                    .parse::<PrayerSlot>()?;
                SearchMode::PrayerTime {
                    slot,
                    time: time_request(params, defaults)?,
                    near,
                }
            }
            Some(other) => {
                return Err(MosqueError::validation(format!(
                    "unknown search mode '{}', expected name, location, coordinates or prayerTime",
                    other
                )));
            }
        };

        let filter = SearchFilter::new(mode).with_page(Page::clamped(params.page));
        match params.sort.as_deref() {
            Some(sort) => filter.with_sort(sort.parse()?),
            None => Ok(filter),
        }
    }

    /// Normalized wire form; parsing it again yields an equal filter.
    pub fn to_params(&self) -> SearchParams {
        let mut params = SearchParams {
            page: Some(self.page.get() as i64),
            sort: Some(self.sort.as_str().to_string()),
            ..SearchParams::default()
        };

        if let Some(near) = self.mode.near() {
            params.lat = Some(near.center.latitude);
            params.lng = Some(near.center.longitude);
            params.radius = Some(near.radius_m);
        }

        match &self.mode {
            SearchMode::Browse => {}
            SearchMode::Name { query, .. } | SearchMode::Location { query, .. } => {
                params.by = Some(self.mode.name().to_string());
                params.query = Some(query.as_str().to_string());
            }
            SearchMode::Coordinates { attribute, .. } => {
                params.by = Some(self.mode.name().to_string());
                if let Some(attribute) = attribute {
                    params.attribute = Some(attribute.kind().to_string());
                    params.query = Some(attribute.text().as_str().to_string());
                }
            }
            SearchMode::PrayerTime { slot, time, .. } => {
                params.by = Some(self.mode.name().to_string());
                params.query = Some(slot.as_str().to_string());
                match time {
                    TimeRequest::At { time, .. } => params.prayer_time = Some(time.to_string()),
                    TimeRequest::Between(window) => {
                        params.time_start = Some(window.start.to_string());
                        params.time_end = Some(window.end.to_string());
                    }
                }
            }
        }
        params
    }
}

fn geo_constraint(
    params: &SearchParams,
    defaults: &SearchDefaults,
) -> Result<Option<GeoConstraint>> {
    match (params.lat, params.lng) {
        (Some(lat), Some(lng)) => {
            let center = Coordinate::new(lng, lat)?;
            GeoConstraint::new(center, params.radius.unwrap_or(defaults.radius_m)).map(Some)
        }
        (None, None) if params.radius.is_some() => {
            Err(MosqueError::validation("radius requires lat and lng"))
        }
        (None, None) => Ok(None),
        _ => Err(MosqueError::validation("lat and lng must be given together")),
    }
}

fn time_request(params: &SearchParams, defaults: &SearchDefaults) -> Result<TimeRequest> {
    let at = |time: TimeOfDay| TimeRequest::At {
        time,
        offset_minutes: defaults.window_minutes,
    };

    match (&params.prayer_time, &params.time_start, &params.time_end) {
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(MosqueError::validation(
            "use either prayerTime or timeStart/timeEnd, not both",
        )),
        (Some(time), None, None) => Ok(at(time.parse()?)),
        (None, Some(start), end) => {
            let end = match end {
                Some(end) => end.parse()?,
                None => TimeOfDay::END_OF_DAY,
            };
            Ok(TimeRequest::Between(TimeWindow::new(start.parse()?, end)))
        }
        (None, None, Some(_)) => Err(MosqueError::validation("timeEnd requires timeStart")),
        (None, None, None) => defaults.prayer_time.map(at).ok_or_else(|| {
            MosqueError::validation("prayerTime search requires prayerTime (HH:MM) or timeStart")
        }),
    }
}
