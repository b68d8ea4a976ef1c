use crate::entry::{AppRecord, EntryId};
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Unknown app '{0}'")]
    Unknown(EntryId),
    #[error("App '{0}' has no exec command")]
    NoExec(EntryId),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Starts the app detached from our stdio.
pub fn spawn(app: &AppRecord) -> Result<(), LaunchError> {
    if !app.is_launchable() {
        return Err(LaunchError::NoExec(app.id.clone()));
    }

    Command::new("sh")
        .arg("-c")
        .arg(app.exec.as_str())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    log::info!("Launched '{}' ({})", app.label, app.id);
    Ok(())
}
