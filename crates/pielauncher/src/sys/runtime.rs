use crate::events::AppEvent;
use async_channel::Sender;
use catalogue::AppSource;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tokio::runtime::Runtime;

/// Runs the socket server, the config watcher and one indexing pass on a
/// tokio runtime of its own. Everything they produce arrives on `tx`.
pub fn start_background_services(
    tx: Sender<AppEvent>,
    socket_path: PathBuf,
    source: Arc<dyn AppSource>,
) {
    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create Tokio runtime: {}", e);
                return;
            }
        };

        rt.block_on(async {
            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::sys::server::run_server(&socket_path, tx).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::config::run_async_watcher(tx).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    index_apps(source, tx).await;
                });
            }

            std::future::pending::<()>().await;
        });
    });
}

/// Scans `source` off the async workers and posts the result.
pub async fn index_apps(source: Arc<dyn AppSource>, tx: Sender<AppEvent>) {
    let scanned = tokio::task::spawn_blocking(move || source.scan()).await;
    match scanned {
        Ok(Ok(records)) => {
            log::debug!("Indexing done, {} apps", records.len());
            if tx.send(AppEvent::CatalogueUpdated(records)).await.is_err() {
                log::debug!("Event loop gone, dropping index");
            }
        }
        Ok(Err(e)) => log::error!("Failed to index apps: {}", e),
        Err(e) => log::error!("Indexing task failed: {}", e),
    }
}
