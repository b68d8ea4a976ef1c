use crate::entry::EntryId;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use fs_err as fs;
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackError {
    #[error(transparent)]
    Encode(#[from] toml::ser::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct IconName(String);

crate::impl_string_newtype!(IconName);

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Drawable {
    pub name: IconName,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IconMapping {
    pub id: EntryId,
    pub icon: IconName,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct PackFile {
    #[serde(default)]
    drawables: Vec<Drawable>,
    #[serde(default)]
    mappings: Vec<IconMapping>,
}

/// Custom icons that replace the app's own icon, keyed by app id.
#[derive(Debug, Clone, Default)]
pub struct IconPack {
    drawables: Vec<Drawable>,
    mappings: HashMap<EntryId, IconName>,
}

impl IconPack {
    pub fn new(drawables: Vec<Drawable>, mappings: Vec<IconMapping>) -> Self {
        Self {
            drawables,
            mappings: mappings.into_iter().map(|m| (m.id, m.icon)).collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
        let s = config::Config::builder()
            .add_source(
                config::File::from(path.to_path_buf())
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .build()?;
        let file: PackFile = s.try_deserialize()?;
        Ok(Self::new(file.drawables, file.mappings))
    }

    /// Writes the pack back in the format `load` reads, mappings sorted by
    /// id. Goes through a sibling temp file like the menu store.
    pub fn store(&self, path: &Path) -> Result<(), PackError> {
        let mut mappings: Vec<IconMapping> = self
            .mappings
            .iter()
            .map(|(id, icon)| IconMapping {
                id: id.clone(),
                icon: icon.clone(),
            })
            .collect();
        mappings.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        let file = PackFile {
            drawables: self.drawables.clone(),
            mappings,
        };
        let content = toml::to_string(&file)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp = path.with_file_name(tmp_name);

        let mut out = fs::File::create(&tmp)?;
        out.write_all(content.as_bytes())?;
        out.sync_all()?;
        drop(out);

        fs::rename(&tmp, path)?;
        log::debug!(
            "Stored icon pack with {} mappings to {}",
            self.mappings.len(),
            path.display()
        );
        Ok(())
    }

    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }

    /// Drawables whose name contains `query`, ignoring case, in pack order.
    pub fn filter(&self, query: &str) -> Vec<&Drawable> {
        let query = query.trim().to_lowercase();
        self.drawables
            .iter()
            .filter(|d| query.is_empty() || d.name.to_lowercase().contains(&query))
            .collect()
    }

    /// Points `id` at the drawable `icon`. Returns `false` and leaves the
    /// pack alone when there is no such drawable.
    pub fn map(&mut self, id: EntryId, icon: IconName) -> bool {
        if !self.drawables.iter().any(|d| d.name == icon) {
            return false;
        }
        self.mappings.insert(id, icon);
        true
    }

    pub fn unmap(&mut self, id: &EntryId) -> Option<IconName> {
        self.mappings.remove(id)
    }

    pub fn icon_for(&self, id: &EntryId) -> Option<&Path> {
        let name = self.mappings.get(id)?;
        self.drawables
            .iter()
            .find(|d| &d.name == name)
            .map(|d| d.path.as_path())
    }
}
