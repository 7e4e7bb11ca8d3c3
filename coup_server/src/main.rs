//! Coup room server: matchmaking, per-room game state, and the HTTP
//! surface in front of it.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Error;
use ctrlc::set_handler;
use log::info;
use pico_args::Arguments;

use coup_core::manager::RoomManager;
use coup_server::{api, config, metrics};

const HELP: &str = "\
Run a Coup room server

USAGE:
  coup_server [OPTIONS]

OPTIONS:
  --bind          IP:PORT   HTTP bind address      [default: env SERVER_BIND or 127.0.0.1:6969]
  --metrics-bind  IP:PORT   Metrics bind address    [default: env METRICS_BIND or 127.0.0.1:9090]

FLAGS:
  -h, --help                Print help information

ENVIRONMENT:
  SERVER_BIND                   HTTP bind address
  METRICS_BIND                  Prometheus metrics bind address
  ROOM_IDLE_TIMEOUT_SECS        Idle window before a room is evicted
  ROOM_IDLE_SWEEP_INTERVAL_SECS How often the idle sweep runs
  RUST_LOG                      Log level filter (see env_logger)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let bind_override: Option<SocketAddr> = pargs.opt_value_from_str("--bind")?;
    let metrics_bind_override: Option<SocketAddr> = pargs.opt_value_from_str("--metrics-bind")?;

    let config = config::ServerConfig::from_env(bind_override, metrics_bind_override)
        .map_err(|e| anyhow::anyhow!("configuration error: {e}"))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("configuration error: {e}"))?;

    set_handler(|| std::process::exit(0))?;

    env_logger::builder().format_target(false).init();
    info!("starting Coup room server at {}", config.bind);

    metrics::init_metrics(config.metrics_bind)
        .map_err(|e| anyhow::anyhow!("failed to start metrics exporter: {e}"))?;
    info!("metrics available at http://{}/metrics", config.metrics_bind);

    let rooms = Arc::new(RoomManager::new(config.idle_timeout));
    spawn_idle_sweep(Arc::clone(&rooms), config.idle_sweep_interval);

    let app = api::create_router(api::AppState { rooms });

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind to {}: {e}", config.bind))?;

    info!("server is running at http://{}. Press Ctrl+C to stop.", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("server error: {e}"))?;

    info!("shutting down server");
    Ok(())
}

/// Periodically reclaim rooms nobody has touched in a while. Lives in
/// the server binary rather than `coup_core` so the FSM crate itself
/// never has to know what a clock is.
fn spawn_idle_sweep(rooms: Arc<RoomManager>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let evicted = rooms.evict_idle_rooms();
            if evicted > 0 {
                info!("evicted {evicted} idle room(s)");
                metrics::rooms_evicted_total(evicted);
            }
            metrics::active_rooms(rooms.room_count());
        }
    });
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install CTRL+C signal handler");
}
