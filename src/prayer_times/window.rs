use serde::{Deserialize, Serialize};

use crate::models::TimeOfDay;
use crate::models::time::MINUTES_PER_DAY;

/// Minutes after the requested time that a prayer-time search still covers.
pub const DEFAULT_WINDOW_MINUTES: u32 = 90;

/// A time-of-day interval, both ends inclusive.
///
/// `end` is earlier than `start` when the interval crosses midnight; callers
/// must not assume `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeWindow {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    pub fn wraps_midnight(&self) -> bool {
        self.end < self.start
    }

    pub fn contains(&self, t: TimeOfDay) -> bool {
        if self.wraps_midnight() {
            t >= self.start || t <= self.end
        } else {
            t >= self.start && t <= self.end
        }
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Window starting at `time` and ending `offset_minutes` later, wrapping past
/// midnight onto the next day's clock.
pub fn compute_window(time: TimeOfDay, offset_minutes: u32) -> TimeWindow {
    // Whole days drop out of the end time; reducing first keeps the sum small.
    let total_end_minutes = time.minutes as u32 + offset_minutes % MINUTES_PER_DAY;
    let end_hours = (time.hours as u32 + total_end_minutes / 60) % 24;
    let end_minutes = total_end_minutes % 60;

    TimeWindow {
        start: time,
        end: TimeOfDay {
            hours: end_hours as u8,
            minutes: end_minutes as u8,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u8, m: u8) -> TimeOfDay {
        TimeOfDay::new(h, m).unwrap()
    }

    #[test]
    fn no_rollover() {
        let w = compute_window(t(10, 15), 90);
        assert_eq!(w.start, t(10, 15));
        assert_eq!(w.end, t(11, 45));
        assert!(!w.wraps_midnight());
    }

    #[test]
    fn minute_rollover() {
        assert_eq!(compute_window(t(9, 45), 90).end, t(11, 15));
    }

    #[test]
    fn day_wraparound() {
        let w = compute_window(t(23, 30), 90);
        assert_eq!(w.end, t(1, 0));
        assert!(w.wraps_midnight());
    }

    #[test]
    fn end_stays_in_range_for_every_minute_of_the_day() {
        for minute in 0..24 * 60 {
            let start = TimeOfDay::from_minute_of_day(minute);
            for offset in [0, 1, 59, 60, 90, 600, 1440, 3000] {
                let w = compute_window(start, offset);
                assert!(w.end.hours <= 23 && w.end.minutes <= 59);
                assert_eq!(w.end.minute_of_day(), (minute + offset) % (24 * 60));
            }
        }
    }

    #[test]
    fn huge_offsets_wrap_instead_of_overflowing() {
        let w = compute_window(t(10, 30), u32::MAX);
        let expected = (10 * 60 + 30 + u32::MAX % MINUTES_PER_DAY) % MINUTES_PER_DAY;
        assert_eq!(w.end.minute_of_day(), expected);
        assert_eq!(compute_window(t(23, 59), u32::MAX - 1).start, t(23, 59));
        assert_eq!(compute_window(t(6, 0), MINUTES_PER_DAY * 1000 + 15).end, t(6, 15));
    }

    #[test]
    fn contains_handles_both_shapes() {
        let day = TimeWindow::new(t(4, 0), t(5, 30));
        assert!(day.contains(t(4, 0)) && day.contains(t(5, 30)) && day.contains(t(4, 59)));
        assert!(!day.contains(t(5, 31)));

        let night = TimeWindow::new(t(23, 30), t(1, 0));
        assert!(night.contains(t(23, 45)) && night.contains(t(0, 10)) && night.contains(t(1, 0)));
        assert!(!night.contains(t(1, 1)) && !night.contains(t(23, 29)));
    }
}
