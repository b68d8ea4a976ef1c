use crate::gui::controller::InteractionSettings;
use crate::gui::menu::{self, Axis, Viewport};
use crate::gui::theme::ThemeColors;
use catalogue::EntryId;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub tap_timeout_ms: u64,
    /// Pixels the finger may travel for a release to still count as a tap.
    pub touch_slop: f64,
    /// Pixels per dp.
    pub density: f64,
    /// dp
    pub max_icon_size: f64,
    /// dp
    pub target_size: f64,
    /// dp
    pub target_padding: f64,
    /// Unset follows the longer side of the viewport.
    pub target_axis: Option<Axis>,
    pub width: f64,
    pub height: f64,
    /// Defaults to `menu` in the data directory.
    pub menu_file: Option<PathBuf>,
    /// Defaults to `apps.toml` in the config directory.
    pub apps_file: Option<PathBuf>,
    pub icon_pack: Option<PathBuf>,
    /// Ids that go first when a default menu is seeded.
    pub preferred: Vec<EntryId>,
    /// Where the image surface writes frames.
    pub frames_dir: Option<PathBuf>,
    pub selected_color: Option<String>,
    pub target_hovered_color: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tap_timeout_ms: 180,
            touch_slop: 10.0,
            density: 1.0,
            max_icon_size: menu::MAX_ICON_SIZE,
            target_size: menu::TARGET_SIZE,
            target_padding: menu::TARGET_PADDING,
            target_axis: None,
            width: 1080.0,
            height: 1920.0,
            menu_file: None,
            apps_file: None,
            icon_pack: None,
            preferred: Vec::new(),
            frames_dir: None,
            selected_color: None,
            target_hovered_color: None,
        }
    }
}

impl Config {
    /// Interaction settings with dp values scaled to pixels.
    pub fn interaction(&self) -> InteractionSettings {
        let density = if self.density > 0.0 {
            self.density
        } else {
            log::warn!("Ignoring density {}, using 1.0", self.density);
            1.0
        };
        InteractionSettings {
            tap_timeout: Duration::from_millis(self.tap_timeout_ms),
            touch_slop: self.touch_slop,
            max_icon_size: self.max_icon_size * density,
            target_size: self.target_size * density,
            target_padding: self.target_padding * density,
            target_axis: self.target_axis,
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    pub fn colors(&self) -> ThemeColors {
        ThemeColors::default().with_highlights(
            self.selected_color.as_deref(),
            self.target_hovered_color.as_deref(),
        )
    }

    pub fn menu_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.menu_file {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join("menu")),
        }
    }

    pub fn apps_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.apps_file {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.config_dir().join("apps.toml")),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("org", "pielauncher", "pielauncher").ok_or(ConfigError::ConfigDirNotFound)
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&get_config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(
            config::File::from(path)
                .format(config::FileFormat::Toml)
                .required(false),
        )
        .add_source(config::Environment::with_prefix("PIELAUNCHER"))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_default() -> Config {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Using default config: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                if is_config_change(&event, &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

fn is_config_change(event: &notify::Event, config_path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs_err::write(&path, DEFAULT_CONFIG).unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.tap_timeout_ms, 180);
        assert_eq!(config.touch_slop, 10.0);
    }

    #[test]
    fn test_partial_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs_err::write(
            &path,
            r#"
density = 2.0
target_axis = "vertical"
preferred = ["browser", "dialer"]
menu_file = "/tmp/pie/menu"
"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.target_axis, Some(Axis::Column));
        assert_eq!(
            config.preferred,
            vec![EntryId::new("browser"), EntryId::new("dialer")]
        );
        assert_eq!(config.menu_path().unwrap(), PathBuf::from("/tmp/pie/menu"));

        let settings = config.interaction();
        assert_eq!(settings.max_icon_size, 128.0);
        assert_eq!(settings.target_size, 96.0);
        assert_eq!(settings.target_padding, 160.0);
        assert_eq!(settings.touch_slop, 10.0);
        assert_eq!(settings.tap_timeout, Duration::from_millis(180));
    }

    #[test]
    fn test_bad_density_falls_back() {
        let config = Config {
            density: 0.0,
            ..Config::default()
        };
        assert_eq!(config.interaction().max_icon_size, menu::MAX_ICON_SIZE);
    }

    #[test]
    fn test_config_change_filter() {
        let path = PathBuf::from("/cfg/config.toml");
        let modify = notify::Event::new(EventKind::Modify(notify::event::ModifyKind::Any))
            .add_path(path.clone());
        let other = notify::Event::new(EventKind::Modify(notify::event::ModifyKind::Any))
            .add_path(PathBuf::from("/cfg/apps.toml"));
        let access = notify::Event::new(EventKind::Access(notify::event::AccessKind::Any))
            .add_path(path.clone());

        assert!(is_config_change(&modify, &path));
        assert!(!is_config_change(&other, &path));
        assert!(!is_config_change(&access, &path));
    }
}
