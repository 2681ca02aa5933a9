use log::debug;

use crate::models::{
    AttributeQuery, Coordinate, GeoConstraint, PrayerSlot, SearchFilter, SearchMode, SearchText,
    SortOrder,
};
use crate::prayer_times::TimeWindow;
use crate::query::filter::{Bounds, Field, FilterExpression, Scalar};
use crate::query::pagination::Pagination;

/// Order the store returns matches in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResultOrder {
    Inserted,
    Name,
    Nearest(Coordinate),
}

/// Everything the store needs to run one search.
#[derive(Debug, Clone, PartialEq)]
pub struct MosqueQuery {
    pub filter: FilterExpression,
    pub pagination: Pagination,
    pub order: ResultOrder,
}

pub fn build_query(search: &SearchFilter, page_size: u32) -> MosqueQuery {
    MosqueQuery {
        filter: build_filter(search),
        pagination: Pagination::new(search.page, page_size),
        order: result_order(search),
    }
}

/// Composes the single filter expression for a search.
///
/// A geo constraint is conjoined with the attribute clause when both are
/// present and returned on its own otherwise.
pub fn build_filter(search: &SearchFilter) -> FilterExpression {
    let attribute = match &search.mode {
        SearchMode::Browse => None,
        SearchMode::Name { query, .. } => Some(text_leaf(Field::Name, query)),
        SearchMode::Location { query, .. } => Some(text_leaf(Field::Location, query)),
        SearchMode::Coordinates { attribute, .. } => attribute.as_ref().map(|a| match a {
            AttributeQuery::Name(q) => text_leaf(Field::Name, q),
            AttributeQuery::Location(q) => text_leaf(Field::Location, q),
        }),
        SearchMode::PrayerTime { slot, time, .. } => Some(prayer_time_clause(*slot, time.window())),
    };
    let geo = search.mode.near().map(geo_leaf);

    let filter = match (attribute, geo) {
        (Some(attribute), Some(geo)) => attribute.and(geo),
        (Some(attribute), None) => attribute,
        (None, Some(geo)) => geo,
        (None, None) => FilterExpression::All,
    };

    debug!("{} filter: {}", search.mode.name(), filter.to_document());
    filter
}

pub fn result_order(search: &SearchFilter) -> ResultOrder {
    match (search.sort, search.mode.near()) {
        (SortOrder::Distance, Some(near)) => ResultOrder::Nearest(near.center),
        (SortOrder::Name, _) => ResultOrder::Name,
        _ => ResultOrder::Inserted,
    }
}

fn text_leaf(field: Field, query: &SearchText) -> FilterExpression {
    FilterExpression::Contains {
        field,
        needle: query.as_str().to_string(),
    }
}

fn geo_leaf(near: &GeoConstraint) -> FilterExpression {
    FilterExpression::Near {
        field: Field::Coordinates,
        center: near.center,
        max_distance_m: near.radius_m,
    }
}

/// The slot must be observed at all, and its time must fall in `window`.
pub fn prayer_time_clause(slot: PrayerSlot, window: TimeWindow) -> FilterExpression {
    FilterExpression::Exists(Field::Prayer(slot)).and(time_range(slot, window))
}

/// Hours and minutes are stored as separate fields, so a time range becomes a
/// disjunction over the boundary hours:
///
/// * start hour with minutes >= start minutes
/// * any hour strictly between start and end
/// * end hour with minutes <= end minutes
///
/// A window that crosses midnight splits into `[start, 24:00)` and
/// `[00:00, end]`; a window inside a single hour is one bounded clause.
fn time_range(slot: PrayerSlot, window: TimeWindow) -> FilterExpression {
    let start_h = window.start.hours as i64;
    let start_m = window.start.minutes as i64;
    let end_h = window.end.hours as i64;
    let end_m = window.end.minutes as i64;

    let hours = Field::Hours(slot);
    let minutes = Field::Minutes(slot);
    let at_hour = |hour: i64, bounds: Bounds| {
        FilterExpression::And(vec![
            FilterExpression::equals(hours, Scalar::Int(hour)),
            FilterExpression::range(minutes, bounds),
        ])
    };

    if window.wraps_midnight() {
        FilterExpression::Or(vec![
            at_hour(start_h, Bounds::at_least(start_m)),
            FilterExpression::range(hours, Bounds::greater_than(start_h)),
            FilterExpression::range(hours, Bounds::less_than(end_h)),
            at_hour(end_h, Bounds::at_most(end_m)),
        ])
    } else if start_h == end_h {
        at_hour(start_h, Bounds::inclusive(start_m, end_m))
    } else {
        FilterExpression::Or(vec![
            at_hour(start_h, Bounds::at_least(start_m)),
            FilterExpression::range(hours, Bounds::strictly_between(start_h, end_h)),
            at_hour(end_h, Bounds::at_most(end_m)),
        ])
    }
}
