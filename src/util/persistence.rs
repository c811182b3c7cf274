use std::fs;
use std::io;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde_json::Error as SerdeError;
use tracing::{debug, warn};

use crate::domain::{BookingSettings, SettingsError};

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "CabinBookings";
const APP_NAME: &str = "CabinBookings";

fn settings_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join("settings.json"))
}

/// Loads saved settings, falling back to defaults when the file is missing,
/// unreadable or holds invalid values.
pub fn load_settings() -> BookingSettings {
    settings_file()
        .and_then(|path| {
            debug!(path = %path.display(), "loading booking settings");
            let data = fs::read_to_string(path).ok()?;
            parse_settings(&data)
        })
        .unwrap_or_default()
}

fn parse_settings(data: &str) -> Option<BookingSettings> {
    let settings: BookingSettings = match serde_json::from_str(data) {
        Ok(settings) => settings,
        Err(err) => {
            warn!("ignoring unreadable settings file: {err}");
            return None;
        }
    };
    match settings.validate() {
        Ok(()) => Some(settings),
        Err(err) => {
            warn!("ignoring invalid settings: {err}");
            None
        }
    }
}

pub fn save_settings(settings: &BookingSettings) -> Result<(), PersistSaveError> {
    settings.validate()?;
    let path = settings_file().ok_or(PersistSaveError::StorageUnavailable)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum PersistSaveError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Invalid(#[from] SettingsError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}
