use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Opaque identifier of a launchable app, one per line in the menu file.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct EntryId(String);

crate::impl_string_newtype!(EntryId);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct AppLabel(String);

crate::impl_string_newtype!(AppLabel);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ExecCommand(String);

crate::impl_string_newtype!(ExecCommand);

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppRecord {
    pub id: EntryId,
    pub label: AppLabel,
    #[serde(default)]
    pub icon: PathBuf,
    #[serde(default = "ExecCommand::empty")]
    pub exec: ExecCommand,
}

impl ExecCommand {
    pub fn empty() -> Self {
        Self(String::new())
    }
}

impl AppRecord {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: EntryId::new(id),
            label: AppLabel::new(label),
            icon: PathBuf::new(),
            exec: ExecCommand::empty(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<PathBuf>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_exec(mut self, exec: impl Into<String>) -> Self {
        self.exec = ExecCommand::new(exec);
        self
    }

    pub fn is_launchable(&self) -> bool {
        !self.exec.trim().is_empty()
    }
}
