//! Mosque discovery: search by name, place, distance or prayer time, and work
//! out which congregational prayer comes next.

pub mod access;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod prayer_times;
pub mod query;
pub mod utils;

pub use error::{MosqueError, Result};
