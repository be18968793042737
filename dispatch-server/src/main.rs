use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::EnvFilter;

use dispatch_server::dashboard::SnapshotStore;
use dispatch_server::solver::SolverConfig;
use dispatch_server::topology;
use dispatch_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr: SocketAddr = std::env::var("DISPATCH_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:5000".to_string())
        .parse()
        .expect("DISPATCH_ADDR must be a socket address like 127.0.0.1:5000");
    let state_file = std::env::var("DISPATCH_STATE_FILE")
        .unwrap_or_else(|_| "dashboard_state.json".to_string());

    let mut config = SolverConfig::default();
    if let Ok(seed) = std::env::var("DISPATCH_SEED") {
        config.seed = Some(
            seed.parse()
                .expect("DISPATCH_SEED must be an unsigned integer"),
        );
    }

    let store = SnapshotStore::open(&state_file).await;
    let state = AppState::new(topology::standard(), config, store);
    let app = create_router(state);

    info!(%addr, state_file, "station dispatch server starting");
    info!("  GET  /health                         - Health check");
    info!("  POST /optimize                       - Run schedule optimization");
    info!("  GET  /dashboard/current_delays       - Delayed trains");
    info!("  GET  /dashboard/train_queue          - Arrivals queue");
    info!("  GET  /dashboard/platform_status      - Platform occupancy");
    info!("  GET  /dashboard/predicted_conflicts  - Detected conflicts");
    info!("  GET  /dashboard/train_type_data      - Delay stats per type");
    info!("  GET  /dashboard/audit_data           - Audit trail");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app).await.expect("server error");
}
