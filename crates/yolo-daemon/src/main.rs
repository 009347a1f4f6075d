//! yolo-daemon: process host for the Yolo engine.
//!
//! Loads configuration, opens the store, and serves the engine over
//! newline-delimited JSON-RPC on a Unix socket until interrupted.

mod commands;
mod config;
mod rpc;

use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use yolo_core::{Engine, ReadMode, Snapshot};

use crate::config::DaemonConfig;
use crate::rpc::RpcServer;

/// Daemon-wide shared state.
pub struct DaemonState {
    pub engine: Engine,
    pub config: DaemonConfig,
}

fn init_tracing(config: &DaemonConfig) -> anyhow::Result<()> {
    // RUST_LOG wins over the configured level.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.advanced.log_level))?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if config.advanced.log_file.is_empty() {
        builder.init();
    } else {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.advanced.log_file)?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    }
    Ok(())
}

/// Seed an empty store from the configured import directory.
fn import_on_startup(engine: &Engine, config: &DaemonConfig) -> anyhow::Result<()> {
    let Some(dir) = config.import_dir() else {
        return Ok(());
    };
    if !engine.is_empty()? {
        info!("Store already populated, skipping import from {:?}", dir);
        return Ok(());
    }

    let snapshot = Snapshot::read_dir(&dir, ReadMode::Startup)?;
    if snapshot.is_empty() {
        warn!("Nothing to import from {:?}", dir);
        return Ok(());
    }
    engine.import_snapshot(&snapshot)?;
    info!(users = snapshot.users.len(), "Imported snapshot from {:?}", dir);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config and start logging
    let config = DaemonConfig::load()?;
    init_tracing(&config)?;

    info!("Yolo daemon starting");

    let data_dir = config.data_dir();
    std::fs::create_dir_all(&data_dir)?;

    // 2. Open the store
    let engine = Engine::open(&config.db_path())?;
    import_on_startup(&engine, &config)?;

    // 3. Build daemon state
    let socket_path = config.socket_path();
    let state = Arc::new(DaemonState { engine, config });

    // 4. Run the RPC server until shutdown
    let rpc_server = RpcServer::new(state.clone(), socket_path.clone());
    info!("Starting JSON-RPC server on {:?}", socket_path);

    tokio::select! {
        result = rpc_server.run() => {
            if let Err(e) = result {
                error!("RPC server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down");
        }
    }

    // Graceful shutdown
    drop(rpc_server);
    let _ = std::fs::remove_file(&socket_path);

    match Arc::try_unwrap(state) {
        Ok(state) => state.engine.close()?,
        Err(_) => warn!("Connections still open; store closes when they finish"),
    }

    info!("Daemon stopped");
    Ok(())
}

#[cfg(test)]
pub(crate) fn test_state() -> Arc<DaemonState> {
    Arc::new(DaemonState {
        engine: Engine::open_memory().expect("open engine"),
        config: DaemonConfig::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_on_startup_seeds_empty_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = Engine::open_memory().expect("source");
        source
            .register("alice", "alice@example.com", "h")
            .expect("register");
        source
            .export_snapshot()
            .expect("export")
            .write_dir(dir.path())
            .expect("write");
        std::fs::write(dir.path().join("comments.json"), "garbage").expect("corrupt");

        let mut config = DaemonConfig::default();
        config.storage.import_dir = dir.path().display().to_string();

        let target = Engine::open_memory().expect("target");
        import_on_startup(&target, &config).expect("import");
        let alice = target.get_user_by_username("alice").expect("lookup");
        assert_eq!(alice.map(|u| u.balance), Some(5));

        // A populated store is left alone.
        target
            .register("bob", "bob@example.com", "h")
            .expect("register");
        import_on_startup(&target, &config).expect("skip");
        assert!(target.get_user_by_username("bob").expect("lookup").is_some());
    }
}
