use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "masjid",
    version,
    author,
    about = "Find mosques nearby and their next congregational prayer"
)]
pub struct Cli {
    /// Database file (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Act as this role for one invocation (guest, imam, admin)
    #[arg(long, global = true)]
    pub role: Option<String>,

    /// Mosque the acting imam is associated with
    #[arg(long, global = true)]
    pub mosque_id: Option<i64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search mosques by name, location, coordinates or prayer time
    Search {
        /// Search mode: name, location, coordinates or prayerTime
        #[arg(long)]
        by: Option<String>,
        /// Free text matched against the name or location; the prayer slot in prayerTime mode
        #[arg(long)]
        query: Option<String>,
        /// Attribute the query applies to in coordinates mode (name, location)
        #[arg(long)]
        attribute: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lng: Option<f64>,
        /// Search radius in meters
        #[arg(long)]
        radius: Option<f64>,
        /// Time of day (HH:MM) searched within the configured window
        #[arg(long)]
        prayer_time: Option<String>,
        /// Window start (HH:MM); alone, the window runs to 23:59
        #[arg(long)]
        time_start: Option<String>,
        /// Window end (HH:MM)
        #[arg(long)]
        time_end: Option<String>,
        /// Page number, starting at 1
        #[arg(long, allow_hyphen_values = true)]
        page: Option<i64>,
        /// Result order: inserted, name or distance
        #[arg(long)]
        sort: Option<String>,
        /// Print the matching documents as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one mosque with its full timetable
    Show {
        id: i64,
        #[arg(long)]
        json: bool,
    },
    /// Show the next prayer at a mosque
    Next {
        id: i64,
        /// Time of day to ask at (HH:MM, defaults to now)
        #[arg(long)]
        at: Option<String>,
        /// Date to ask on (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Print the search window around a time of day
    Window {
        /// Time of day (HH:MM)
        time: String,
        /// Minutes the window extends past the time (defaults to search.window_minutes)
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Register a mosque from a JSON document
    Add {
        file: PathBuf,
    },
    /// Replace a mosque's details from a JSON document
    Update {
        id: i64,
        file: PathBuf,
    },
    /// Mark a mosque as verified
    Verify {
        id: i64,
    },
    /// Delete a mosque that has not been verified
    Reject {
        id: i64,
    },
    /// Delete a mosque
    Delete {
        id: i64,
    },
    /// List mosques waiting for verification
    Unverified,
}
