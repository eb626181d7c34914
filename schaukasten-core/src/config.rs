//! Global schaukasten configuration.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::bilingual::Language;
use crate::error::{SchaukastenError, SchaukastenResult};

pub const DEFAULT_CALENDAR_URL: &str =
    "https://calendar.google.com/calendar/ical/queerreferat.aachen%40gmail.com/public/basic.ics";

pub const DEFAULT_TIMEZONE: &str = "Europe/Berlin";

fn default_calendar_url() -> String {
    DEFAULT_CALENDAR_URL.to_string()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_languages() -> Vec<Language> {
    Language::ALL.to_vec()
}

/// Configuration at ~/.config/schaukasten/config.toml
///
/// Every key is optional; command-line flags take precedence.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_calendar_url")]
    pub calendar_url: String,

    /// IANA name of the zone events are displayed in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Venue address that is not repeated for events taking place there
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_location: Option<String>,

    #[serde(default = "default_languages")]
    pub languages: Vec<Language>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            calendar_url: default_calendar_url(),
            timezone: default_timezone(),
            home_location: None,
            languages: default_languages(),
        }
    }
}

impl Config {
    pub fn config_path() -> SchaukastenResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SchaukastenError::Config("Could not determine config directory".into()))?
            .join("schaukasten");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file, or the defaults when there is none.
    pub fn load() -> SchaukastenResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> SchaukastenResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            SchaukastenError::Config(format!("Could not parse {}: {}", path.display(), e))
        })
    }

    pub fn timezone(&self) -> SchaukastenResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| SchaukastenError::InvalidTimezone(self.timezone.clone()))
    }

    /// Whether `place` is the configured home venue.
    pub fn is_home(&self, place: &str) -> bool {
        self.home_location
            .as_deref()
            .is_some_and(|home| home.trim() == place.trim())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> SchaukastenResult<()> {
        let contents = format!(
            "\
# schaukasten configuration

# Calendar feed to read:
# calendar_url = \"{}\"

# Timezone events are shown in:
# timezone = \"{}\"

# Venue address that is left out of the overview:
# home_location = \"Gerlachstraße 20-22, 52064 Aachen\"

# Languages to render (de, en):
# languages = [\"de\", \"en\"]
",
            DEFAULT_CALENDAR_URL, DEFAULT_TIMEZONE
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SchaukastenError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| SchaukastenError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
