use std::sync::Arc;

use file_exchange::config::{AppState, Config};
use file_exchange::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional first argument: config file path without extension
    let cfg = match std::env::args().nth(1) {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };
    logger::init(&cfg)?;

    // Create Tokio runtime, thread count from `server.workers`
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let state = Arc::new(AppState::from_config(cfg));

    if let Err(e) = state.store.ensure_dir() {
        logger::log_error(&format!(
            "Failed to create upload directory '{}': {e}",
            state.store.dir().display()
        ));
        return Err(e.into());
    }

    let listener = match server::bind_listener(addr) {
        Ok(l) => l,
        Err(e) => {
            logger::log_error(&format!("Server failed to start on {addr}: {e}"));
            return Err(e.into());
        }
    };

    logger::log_server_start(&listener.local_addr()?, &state.config);
    server::serve(listener, state, server::shutdown_signal()).await;
    Ok(())
}
