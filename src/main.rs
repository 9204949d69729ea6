use clap::Parser;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod model;
mod server;
mod store;

#[derive(Parser, Debug)]
#[command(about = "HTTP server exposing CRUD operations on albums")]
struct CliArgs {
    /// Configuration file path (extension optional)
    #[arg(short, long, default_value = "config")]
    config: String,

    /// Serve from an in-memory store instead of PostgreSQL
    #[arg(long)]
    memory: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // A missing .env file is fine; DB_* may come from the real environment
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    let mut cfg = config::Config::load_from(&args.config)?;
    if args.memory {
        cfg.storage.backend = config::StorageBackend::Memory;
    }

    logger::init(&cfg).map_err(|e| e as Box<dyn std::error::Error>)?;
    if !dotenv_loaded {
        logger::log_warning("No .env file found");
    }

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        logger::log_info(&format!("Using {workers} worker threads"));
    } else {
        logger::log_info("Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    let album_store = match store::open(cfg.storage.backend).await {
        Ok(s) => s,
        Err(e) => {
            logger::log_error(&format!("Failed to open album store: {e}"));
            return Err(e);
        }
    };

    let listener = server::create_listener(addr, cfg.performance.backlog)?;
    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(config::AppState::new(cfg, album_store));
    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    server::start_server_loop(
        listener,
        state,
        Arc::new(AtomicUsize::new(0)),
        Arc::clone(&signals),
    )
    .await?;

    if signals.is_shutdown_requested() {
        logger::log_info("Server stopped");
    }
    Ok(())
}
