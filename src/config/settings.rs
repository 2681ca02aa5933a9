use anyhow::{Context, Result};
use directories::ProjectDirs;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::{Role, SearchDefaults, Session, TimeOfDay};
use crate::prayer_times::DEFAULT_WINDOW_MINUTES;
use crate::query::DEFAULT_PAGE_SIZE;

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}
fn default_radius_m() -> f64 {
    crate::models::search::DEFAULT_RADIUS_M
}
fn default_window_minutes() -> u32 {
    DEFAULT_WINDOW_MINUTES
}
fn default_user() -> String {
    "local".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_radius_m")]
    pub default_radius_m: f64,
    #[serde(default = "default_window_minutes")]
    pub window_minutes: u32,
    /// Injected into prayer-time searches that name no time ("HH:MM").
    /// Unset means such searches are rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_prayer_time: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            default_radius_m: default_radius_m(),
            window_minutes: default_window_minutes(),
            default_prayer_time: None,
        }
    }
}

impl SearchConfig {
    pub fn defaults(&self) -> crate::Result<SearchDefaults> {
        let prayer_time = self
            .default_prayer_time
            .as_deref()
            .map(str::parse::<TimeOfDay>)
            .transpose()?;
        Ok(SearchDefaults {
            radius_m: self.default_radius_m,
            window_minutes: self.window_minutes,
            prayer_time,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mosque_id: Option<i64>,
    #[serde(default = "default_user")]
    pub user: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            role: Role::Guest,
            mosque_id: None,
            user: default_user(),
        }
    }
}

impl IdentityConfig {
    pub fn session(&self) -> Session {
        Session {
            user: self.user.clone(),
            role: self.role,
            mosque_id: self.mosque_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CalendarConfig {
    /// Days to add/subtract from the Hijri date for local moon sighting.
    #[serde(default)]
    pub hijri_offset: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "masjid")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("masjid.db"))
    }

    pub fn load() -> Result<Self> {
        Self::load_or_init(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        config.search.defaults().context("Invalid [search] settings")?;
        Ok(config)
    }

    /// Loads `path`, writing a starter file with the defaults when none exists.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }
        let config = Self::default();
        config.save_to(path)?;
        info!("Wrote default config to {:?}", path);
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
