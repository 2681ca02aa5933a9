use serde_json::{json, Map, Value};

use crate::models::{Coordinate, MosqueRecord, PrayerSlot};

/// Addressable fields of a stored mosque document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Location,
    Imam,
    Verified,
    Coordinates,
    /// The whole `prayerTimes.<slot>` sub-document.
    Prayer(PrayerSlot),
    Hours(PrayerSlot),
    Minutes(PrayerSlot),
}

impl Field {
    /// Dotted document path, e.g. `prayerTimes.fajr.hours`.
    pub fn path(&self) -> String {
        match self {
            Field::Name => "name".to_string(),
            Field::Location => "location".to_string(),
            Field::Imam => "imam".to_string(),
            Field::Verified => "verified".to_string(),
            Field::Coordinates => "coordinates".to_string(),
            Field::Prayer(slot) => format!("prayerTimes.{}", slot.as_str()),
            Field::Hours(slot) => format!("prayerTimes.{}.hours", slot.as_str()),
            Field::Minutes(slot) => format!("prayerTimes.{}.minutes", slot.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Int(i64),
    Bool(bool),
    Text(String),
}

impl Scalar {
    fn to_json(&self) -> Value {
        match self {
            Scalar::Int(i) => json!(i),
            Scalar::Bool(b) => json!(b),
            Scalar::Text(s) => json!(s),
        }
    }
}

/// Numeric bounds; unset sides are open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub gt: Option<i64>,
    pub gte: Option<i64>,
    pub lt: Option<i64>,
    pub lte: Option<i64>,
}

impl Bounds {
    pub fn at_least(v: i64) -> Self {
        Self { gte: Some(v), ..Self::default() }
    }

    pub fn at_most(v: i64) -> Self {
        Self { lte: Some(v), ..Self::default() }
    }

    pub fn greater_than(v: i64) -> Self {
        Self { gt: Some(v), ..Self::default() }
    }

    pub fn less_than(v: i64) -> Self {
        Self { lt: Some(v), ..Self::default() }
    }

    pub fn strictly_between(low: i64, high: i64) -> Self {
        Self {
            gt: Some(low),
            lt: Some(high),
            ..Self::default()
        }
    }

    pub fn inclusive(low: i64, high: i64) -> Self {
        Self {
            gte: Some(low),
            lte: Some(high),
            ..Self::default()
        }
    }

    pub fn contains(&self, v: i64) -> bool {
        self.gt.is_none_or(|b| v > b)
            && self.gte.is_none_or(|b| v >= b)
            && self.lt.is_none_or(|b| v < b)
            && self.lte.is_none_or(|b| v <= b)
    }
}

/// Predicate tree handed to the mosque store.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpression {
    /// Matches every record.
    All,
    And(Vec<FilterExpression>),
    Or(Vec<FilterExpression>),
    Exists(Field),
    Equals { field: Field, value: Scalar },
    /// Case-insensitive substring match.
    Contains { field: Field, needle: String },
    Range { field: Field, bounds: Bounds },
    /// Within `max_distance_m` meters of `center`.
    Near {
        field: Field,
        center: Coordinate,
        max_distance_m: f64,
    },
}

enum Resolved<'a> {
    Int(i64),
    Bool(bool),
    Text(&'a str),
}

impl FilterExpression {
    pub fn equals(field: Field, value: Scalar) -> Self {
        FilterExpression::Equals { field, value }
    }

    pub fn range(field: Field, bounds: Bounds) -> Self {
        FilterExpression::Range { field, bounds }
    }

    /// Conjunction that flattens nested `And`s and drops `All` operands, so
    /// no empty operand is ever introduced.
    pub fn and(self, other: FilterExpression) -> FilterExpression {
        use FilterExpression::{All, And};
        match (self, other) {
            (All, e) | (e, All) => e,
            (And(mut a), And(b)) => {
                a.extend(b);
                And(a)
            }
            (And(mut a), e) => {
                a.push(e);
                And(a)
            }
            (e, And(mut b)) => {
                b.insert(0, e);
                And(b)
            }
            (a, b) => And(vec![a, b]),
        }
    }

    pub fn matches(&self, record: &MosqueRecord) -> bool {
        match self {
            FilterExpression::All => true,
            FilterExpression::And(parts) => parts.iter().all(|p| p.matches(record)),
            FilterExpression::Or(parts) => parts.iter().any(|p| p.matches(record)),
            FilterExpression::Exists(field) => match field {
                Field::Prayer(slot) => record.prayer_times.get(*slot).is_some(),
                Field::Coordinates => true,
                other => resolve(record, *other).is_some(),
            },
            FilterExpression::Equals { field, value } => {
                match (resolve(record, *field), value) {
                    (Some(Resolved::Int(a)), Scalar::Int(b)) => a == *b,
                    (Some(Resolved::Bool(a)), Scalar::Bool(b)) => a == *b,
                    (Some(Resolved::Text(a)), Scalar::Text(b)) => a == b,
                    _ => false,
                }
            }
            FilterExpression::Contains { field, needle } => match resolve(record, *field) {
                Some(Resolved::Text(haystack)) => haystack
                    .to_lowercase()
                    .contains(&needle.to_lowercase()),
                _ => false,
            },
            FilterExpression::Range { field, bounds } => match resolve(record, *field) {
                Some(Resolved::Int(v)) => bounds.contains(v),
                _ => false,
            },
            FilterExpression::Near {
                field,
                center,
                max_distance_m,
            } => match field {
                Field::Coordinates => record.coordinates.distance_m(center) <= *max_distance_m,
                _ => false,
            },
        }
    }

    /// Renders the tree as a query document (MongoDB operator syntax), the
    /// form that gets logged and handed to document stores.
    pub fn to_document(&self) -> Value {
        match self {
            FilterExpression::All => json!({}),
            FilterExpression::And(parts) => {
                json!({ "$and": parts.iter().map(|p| p.to_document()).collect::<Vec<_>>() })
            }
            FilterExpression::Or(parts) => {
                json!({ "$or": parts.iter().map(|p| p.to_document()).collect::<Vec<_>>() })
            }
            FilterExpression::Exists(field) => single(field, json!({ "$exists": true })),
            FilterExpression::Equals { field, value } => single(field, value.to_json()),
            FilterExpression::Contains { field, needle } => single(
                field,
                json!({ "$regex": escape_regex(needle), "$options": "i" }),
            ),
            FilterExpression::Range { field, bounds } => {
                let mut ops = Map::new();
                let named = [
                    ("$gt", bounds.gt),
                    ("$gte", bounds.gte),
                    ("$lt", bounds.lt),
                    ("$lte", bounds.lte),
                ];
                for (op, value) in named {
                    if let Some(v) = value {
                        ops.insert(op.to_string(), json!(v));
                    }
                }
                single(field, Value::Object(ops))
            }
            FilterExpression::Near {
                field,
                center,
                max_distance_m,
            } => single(
                field,
                json!({
                    "$near": {
                        "$geometry": {
                            "type": "Point",
                            "coordinates": [center.longitude, center.latitude],
                        },
                        "$maxDistance": max_distance_m,
                    }
                }),
            ),
        }
    }
}

fn single(field: &Field, condition: Value) -> Value {
    let mut doc = Map::new();
    doc.insert(field.path(), condition);
    Value::Object(doc)
}

fn resolve(record: &MosqueRecord, field: Field) -> Option<Resolved<'_>> {
    match field {
        Field::Name => Some(Resolved::Text(&record.name)),
        Field::Location => Some(Resolved::Text(&record.location)),
        Field::Imam => Some(Resolved::Text(&record.imam)),
        Field::Verified => Some(Resolved::Bool(record.verified)),
        Field::Coordinates | Field::Prayer(_) => None,
        Field::Hours(slot) => record
            .prayer_times
            .get(slot)
            .map(|t| Resolved::Int(t.hours as i64)),
        Field::Minutes(slot) => record
            .prayer_times
            .get(slot)
            .map(|t| Resolved::Int(t.minutes as i64)),
    }
}

fn escape_regex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if "\\.+*?()|[]{}^$#&-~".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
