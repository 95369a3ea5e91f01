use clap::Parser;
use std::sync::Arc;

mod api;
mod config;
mod handler;
mod http;
mod logger;
mod server;

/// Local development server for the research data web application
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Port to listen on (overrides the PORT environment variable)
    port: Option<String>,

    /// TOML configuration file; a missing file is ignored
    #[arg(long, short = 'c', default_value = "config.toml")]
    config: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let mut cfg = config::Config::load(&args.config)?;
    logger::init(&cfg)?;

    if let Err(warning) = cfg.apply_port_arg(args.port.as_deref()) {
        logger::log_warning(&warning);
    }

    // Tokio runtime sized by `server.workers`; the blocking pool does the file I/O
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let state = Arc::new(config::AppState::new(&cfg)?);
    let listener = server::create_listener(addr)?;

    server::start_signal_handler(Arc::clone(&state.shutdown))?;
    logger::log_server_start(&addr, &state);

    // Connections are served as local tasks
    let local = tokio::task::LocalSet::new();
    local.run_until(server::start_server_loop(listener, state)).await;
    Ok(())
}
