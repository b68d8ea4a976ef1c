use anyhow::Context;
use catalogue::{AppSource, Catalogue, EntryId, IconName, IconPack, ManifestSource};
use clap::{Parser, Subcommand};
use pielauncher::config::{self, Config};
use pielauncher::gui::controller::TouchPhase;
use pielauncher::gui::menu::Surface;
use pielauncher::sys::daemon::Daemon;
use pielauncher::sys::runtime;
use pielauncher::sys::server::SOCKET_PATH;
use pielauncher::sys::surface::LogSurface;
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "pielauncher", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Control socket of the daemon
    #[arg(short = 's', long, default_value = SOCKET_PATH)]
    socket: PathBuf,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Run the menu daemon.
    Daemon,
    /// Send a touch event: down, move, up or cancel.
    Touch {
        phase: TouchPhase,
        x: f64,
        y: f64,
        /// Event time in milliseconds; defaults to the daemon's clock
        #[arg(short = 't', long)]
        time: Option<u64>,
    },
    /// Leave edit mode, dropping its changes.
    Back,
    /// Enter edit mode.
    Edit,
    /// Start placing an app in the menu from the given point.
    Add { id: String, x: f64, y: f64 },
    /// Report a new screen size.
    Resize { width: f64, height: f64 },
    /// List apps whose name contains QUERY (all apps without one).
    Search { query: Option<String> },
    /// Browse or edit the icon pack.
    Icons {
        #[command(subcommand)]
        action: IconsAction,
    },
    /// Print the current menu.
    Menu,
    /// Write the default config file if there is none.
    InitConfig,
}

#[derive(Subcommand, Debug, Clone)]
enum IconsAction {
    /// List drawables whose name contains QUERY.
    List { query: Option<String> },
    /// Use drawable NAME as the icon of app ID.
    Map { id: String, name: String },
    /// Give app ID its own icon back.
    Reset { id: String },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Daemon => run_daemon(cli.socket),
        Commands::Touch { phase, x, y, time } => {
            let line = match time {
                Some(ms) => format!("{phase} {x} {y} {ms}"),
                None => format!("{phase} {x} {y}"),
            };
            send_command(&cli.socket, &line)
        }
        Commands::Back => send_command(&cli.socket, "back"),
        Commands::Edit => send_command(&cli.socket, "edit"),
        Commands::Add { id, x, y } => send_command(&cli.socket, &format!("add {id} {x} {y}")),
        Commands::Resize { width, height } => {
            send_command(&cli.socket, &format!("resize {width} {height}"))
        }
        Commands::Search { query } => {
            let catalogue = load_catalogue(&config::load_or_default())?;
            for app in catalogue.filter_by(query.as_deref().unwrap_or_default()) {
                println!("{}\t{}", app.id, app.label);
            }
            Ok(())
        }
        Commands::Icons { action } => run_icons(action),
        Commands::Menu => {
            let catalogue = load_catalogue(&config::load_or_default())?;
            for app in catalogue.list_entries() {
                println!("{}\t{}", app.id, app.label);
            }
            Ok(())
        }
        Commands::InitConfig => {
            let path = config::write_default_config()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn run_icons(action: IconsAction) -> anyhow::Result<()> {
    let config = config::load_or_default();
    let Some(path) = &config.icon_pack else {
        anyhow::bail!("No icon_pack configured");
    };
    let mut pack = IconPack::load(path)
        .with_context(|| format!("Failed to load icon pack {}", path.display()))?;

    match action {
        IconsAction::List { query } => {
            for drawable in pack.filter(query.as_deref().unwrap_or_default()) {
                println!("{}\t{}", drawable.name, drawable.path.display());
            }
            return Ok(());
        }
        IconsAction::Map { id, name } => {
            if !pack.map(EntryId::new(id), IconName::new(name.as_str())) {
                anyhow::bail!("No drawable named '{}' in {}", name, path.display());
            }
        }
        IconsAction::Reset { id } => {
            if pack.unmap(&EntryId::new(id.as_str())).is_none() {
                log::warn!("'{}' had no custom icon", id);
            }
        }
    }
    pack.store(path)
        .with_context(|| format!("Failed to store icon pack {}", path.display()))
}

fn build_catalogue(config: &Config) -> anyhow::Result<Catalogue> {
    let mut catalogue =
        Catalogue::new(config.menu_path()?).with_preferred(config.preferred.clone());
    if let Some(path) = &config.icon_pack {
        let pack = IconPack::load(path)
            .with_context(|| format!("Failed to load icon pack {}", path.display()))?;
        catalogue = catalogue.with_icon_pack(pack);
    }
    Ok(catalogue)
}

/// Catalogue with the manifest scanned in place, for one-shot commands.
fn load_catalogue(config: &Config) -> anyhow::Result<Catalogue> {
    let catalogue = build_catalogue(config)?;
    catalogue.refresh(&ManifestSource::new(config.apps_path()?))?;
    Ok(catalogue)
}

fn run_daemon(socket: PathBuf) -> anyhow::Result<()> {
    let config = config::load_or_default();
    let catalogue = build_catalogue(&config)?;
    let source: Arc<dyn AppSource> = Arc::new(ManifestSource::new(config.apps_path()?));

    let (tx, rx) = async_channel::bounded(32);
    runtime::start_background_services(tx, socket, source);

    let mut daemon = Daemon::new(&config, catalogue, make_surface(&config)?);
    log::info!(
        "Menu ready with {} entries",
        daemon.controller().menu().len()
    );

    while let Ok(event) = rx.recv_blocking() {
        log::trace!("Event {:?}", event);
        daemon.handle(event);
    }
    Ok(())
}

#[cfg(feature = "cairo")]
fn make_surface(config: &Config) -> anyhow::Result<Box<dyn Surface>> {
    use pielauncher::gui::png::PngSurface;

    match &config.frames_dir {
        Some(dir) => Ok(Box::new(PngSurface::new(config.viewport(), dir)?)),
        None => Ok(Box::new(LogSurface::new())),
    }
}

#[cfg(not(feature = "cairo"))]
fn make_surface(config: &Config) -> anyhow::Result<Box<dyn Surface>> {
    if config.frames_dir.is_some() {
        log::warn!("frames_dir needs the cairo feature, logging frames instead");
    }
    Ok(Box::new(LogSurface::new()))
}

fn send_command(socket: &Path, cmd: &str) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(socket).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to pielauncher daemon at {}: {}. Is it running?",
            socket.display(),
            e
        )
    })?;
    writeln!(stream, "{}", cmd)?;
    Ok(())
}
