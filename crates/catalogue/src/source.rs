use crate::entry::AppRecord;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Manifest error: {0}")]
    Manifest(#[from] config::ConfigError),
}

/// Something that can list the launchable apps. Scanning may block; callers
/// run it off the interaction path.
pub trait AppSource: Send + Sync {
    fn scan(&self) -> Result<Vec<AppRecord>, SourceError>;
}

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    apps: Vec<AppRecord>,
}

/// Reads apps from a TOML manifest:
///
/// ```toml
/// [[apps]]
/// id = "firefox"
/// label = "Firefox"
/// icon = "/usr/share/icons/hicolor/64x64/apps/firefox.png"
/// exec = "firefox"
/// ```
#[derive(Debug, Clone)]
pub struct ManifestSource {
    path: PathBuf,
}

impl ManifestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AppSource for ManifestSource {
    fn scan(&self) -> Result<Vec<AppRecord>, SourceError> {
        let s = config::Config::builder()
            .add_source(
                config::File::from(self.path.clone())
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .build()?;

        let manifest: Manifest = s.try_deserialize()?;
        log::debug!(
            "Scanned {} apps from {}",
            manifest.apps.len(),
            self.path.display()
        );
        Ok(manifest.apps)
    }
}

/// A fixed list of apps.
#[derive(Debug, Clone, Default)]
pub struct StaticSource(pub Vec<AppRecord>);

impl AppSource for StaticSource {
    fn scan(&self) -> Result<Vec<AppRecord>, SourceError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryId;
    use fs_err as fs;

    #[test]
    fn test_manifest_source_reads_apps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apps.toml");
        fs::write(
            &path,
            r#"
[[apps]]
id = "firefox"
label = "Firefox"
exec = "firefox"

[[apps]]
id = "term"
label = "Terminal"
icon = "/tmp/term.png"
"#,
        )
        .unwrap();

        let apps = ManifestSource::new(&path).scan().unwrap();

        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].id, EntryId::new("firefox"));
        assert!(apps[0].is_launchable());
        assert_eq!(apps[1].icon, PathBuf::from("/tmp/term.png"));
        assert!(!apps[1].is_launchable());
    }

    #[test]
    fn test_missing_manifest_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let apps = ManifestSource::new(dir.path().join("none.toml"))
            .scan()
            .unwrap();
        assert!(apps.is_empty());
    }
}
