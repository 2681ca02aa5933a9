pub mod mosque;
pub mod prayer;
pub mod search;
pub mod session;
pub mod time;

pub use mosque::{Coordinate, MosqueRecord, NewMosque};
pub use prayer::{AzanTimes, PrayerSchedule, PrayerSlot};
pub use search::{
    AttributeQuery, GeoConstraint, SearchDefaults, SearchFilter, SearchMode, SearchParams,
    SearchText, SortOrder, TimeRequest,
};
pub use session::{Role, Session};
pub use time::TimeOfDay;
