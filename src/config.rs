use crate::models::error::SError;
use crate::models::paths::{CachePaths, StorePaths};
use camino::{Utf8Path, Utf8PathBuf};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const APP_NAME: &str = "herbarium";
const CONFIG_NAME: &str = "config";
const DEFAULT_APP_ID: &str = "331470";

/// What to do when a disabled mod cannot be renamed into the holding
/// directory and would have to be copied instead.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CrossDevicePolicy {
    /// Ask the operator once per relocation pass.
    #[default]
    Ask,
    Always,
    Never,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub game_exe: Utf8PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
    pub workshop_root: Utf8PathBuf,
    #[serde(default)]
    pub disabled_dir: Option<Utf8PathBuf>,
    #[serde(default = "default_target_process")]
    pub target_process: String,
    #[serde(default = "default_app_id")]
    pub app_id: String,
    #[serde(default)]
    pub cross_device: CrossDevicePolicy,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let home = home_dir();

        Self {
            game_exe: "/usr/bin/steam".into(),
            args: vec!["-applaunch".into(), DEFAULT_APP_ID.into()],
            workshop_root: home
                .join(".steam/steam/steamapps/workshop/content")
                .join(DEFAULT_APP_ID),
            disabled_dir: Some(default_disabled_dir(&home)),
            target_process: default_target_process(),
            app_id: default_app_id(),
            cross_device: CrossDevicePolicy::default(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl AppConfig {
    /// Loads the user config, writing the defaults first if none exists.
    pub fn load() -> Result<AppConfig, SError> {
        Ok(confy::load(APP_NAME, CONFIG_NAME)?)
    }

    pub fn save(&self) -> Result<(), SError> {
        Ok(confy::store(APP_NAME, CONFIG_NAME, self)?)
    }

    pub fn load_from(path: &Utf8Path) -> Result<AppConfig, SError> {
        Ok(confy::load_path(path)?)
    }

    pub fn save_to(&self, path: &Utf8Path) -> Result<(), SError> {
        Ok(confy::store_path(path, self)?)
    }

    pub fn config_path() -> Result<Utf8PathBuf, SError> {
        let path = confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)?;
        Ok(Utf8PathBuf::try_from(path)?)
    }

    /// Where disabled mods are parked while the game runs.
    pub fn holding_dir(&self) -> Utf8PathBuf {
        match &self.disabled_dir {
            Some(dir) if !dir.as_str().is_empty() => dir.clone(),
            _ => default_disabled_dir(&home_dir()),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

pub fn store_paths() -> Result<StorePaths, SError> {
    let dirs = project_dirs()?;
    let base = Utf8PathBuf::try_from(dirs.data_local_dir().to_path_buf())?;
    Ok(StorePaths::new(&base))
}

pub fn cache_paths() -> Result<CachePaths, SError> {
    let dirs = project_dirs()?;
    let base = Utf8PathBuf::try_from(dirs.cache_dir().to_path_buf())?;
    Ok(CachePaths::new(&base))
}

fn project_dirs() -> Result<ProjectDirs, SError> {
    ProjectDirs::from("ru", "ximper", APP_NAME)
        .ok_or_else(|| SError::ConfigError("unable to resolve home directory".into()))
}

fn home_dir() -> Utf8PathBuf {
    BaseDirs::new()
        .and_then(|dirs| Utf8PathBuf::from_path_buf(dirs.home_dir().to_path_buf()).ok())
        .unwrap_or_else(|| Utf8PathBuf::from("."))
}

fn default_disabled_dir(home: &Utf8Path) -> Utf8PathBuf {
    home.join(".elmod_disabled")
}

fn default_target_process() -> String {
    "Everlasting Sum".to_string()
}

fn default_app_id() -> String {
    DEFAULT_APP_ID.to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}
