//! Line protocol of the control socket.
//!
//! ```text
//! down <x> <y> [ms]     touch phases; time defaults to the server clock
//! move <x> <y> [ms]
//! up <x> <y> [ms]
//! cancel [<x> <y>] [ms]
//! back
//! edit
//! add <id> <x> <y>
//! resize <width> <height>
//! ```

use crate::events::AppEvent;
use crate::gui::controller::{TouchEvent, TouchPhase};
use crate::gui::menu::{Point, Viewport};
use async_channel::Sender;
use catalogue::EntryId;
use std::path::Path;
use std::str::FromStr;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

pub const SOCKET_PATH: &str = "/tmp/pielauncher.sock";

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command '{0}'")]
    Unknown(String),
    #[error("Missing argument '{0}'")]
    Missing(&'static str),
    #[error("Bad number '{0}'")]
    BadNumber(String),
    #[error("Unexpected argument '{0}'")]
    Extra(String),
}

/// Parses one command line. `now` stamps touch events that carry no time.
pub fn parse_command(line: &str, now: Duration) -> Result<AppEvent, CommandError> {
    let mut args = line.split_whitespace();
    let command = args.next().ok_or(CommandError::Empty)?;

    let event = match command.to_lowercase().as_str() {
        "back" => AppEvent::Back,
        "edit" => AppEvent::Edit,
        "add" => {
            let id = args.next().ok_or(CommandError::Missing("id"))?;
            AppEvent::Add {
                id: EntryId::new(id),
                from: Point::new(coord(args.next(), "x")?, coord(args.next(), "y")?),
            }
        }
        "resize" => AppEvent::Resize(Viewport::new(
            coord(args.next(), "width")?,
            coord(args.next(), "height")?,
        )),
        "cancel" => {
            let rest: Vec<&str> = args.by_ref().collect();
            let (point, time) = match rest.as_slice() {
                [] => (Point::default(), now),
                [x, y] => (Point::new(coord(Some(*x), "x")?, coord(Some(*y), "y")?), now),
                [x, y, ms] => (
                    Point::new(coord(Some(*x), "x")?, coord(Some(*y), "y")?),
                    Duration::from_millis(number(Some(*ms), "ms")?),
                ),
                [_] => return Err(CommandError::Missing("y")),
                [.., extra] => return Err(CommandError::Extra(extra.to_string())),
            };
            AppEvent::Touch(TouchEvent {
                phase: TouchPhase::Cancel,
                point,
                time,
            })
        }
        other => {
            let phase =
                TouchPhase::from_str(other).map_err(|_| CommandError::Unknown(other.to_string()))?;
            let x = coord(args.next(), "x")?;
            let y = coord(args.next(), "y")?;
            let time = match args.next() {
                Some(ms) => Duration::from_millis(number(Some(ms), "ms")?),
                None => now,
            };
            AppEvent::Touch(TouchEvent::new(phase, x, y, time))
        }
    };

    match args.next() {
        Some(extra) => Err(CommandError::Extra(extra.to_string())),
        None => Ok(event),
    }
}

fn number<T: FromStr>(arg: Option<&str>, name: &'static str) -> Result<T, CommandError> {
    let arg = arg.ok_or(CommandError::Missing(name))?;
    arg.parse()
        .map_err(|_| CommandError::BadNumber(arg.to_string()))
}

/// Coordinates and sizes must be finite; `nan` and `inf` parse as `f64`.
fn coord(arg: Option<&str>, name: &'static str) -> Result<f64, CommandError> {
    let value: f64 = number(arg, name)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CommandError::BadNumber(arg.unwrap_or_default().to_string()))
    }
}

pub async fn run_server(socket_path: &Path, tx: Sender<AppEvent>) {
    // Cleanup old socket if it exists
    if fs_err::metadata(socket_path).is_ok() {
        let _ = fs_err::remove_file(socket_path);
    }

    let listener = match UnixListener::bind(socket_path) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };
    log::info!("Listening on {}", socket_path.display());

    let started = Instant::now();
    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        if line.trim().is_empty() {
                            continue;
                        }
                        match parse_command(&line, started.elapsed()) {
                            Ok(event) => {
                                if tx.send(event).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => log::warn!("Ignoring '{}': {}", line.trim(), e),
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}
