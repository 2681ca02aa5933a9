pub mod next;
pub mod window;

pub use next::{congregational_override, next_occurring, next_prayer, UpcomingPrayer};
pub use window::{compute_window, TimeWindow, DEFAULT_WINDOW_MINUTES};
