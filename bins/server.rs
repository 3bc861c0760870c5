use std::process::ExitCode;

use dotenvy::dotenv;
use tracing::{error, info, warn};
use uuid::Uuid;

fn init_logging() {
    // .env has to be loaded before the subscriber reads RUST_LOG / LOG_FORMAT
    dotenv().ok();
    common::utils::logging::init_logging_from_env();
}

/// Resolves on Ctrl+C. If the signal handler cannot be installed the server
/// keeps running until the process is killed.
async fn shutdown_signal(service_id: Uuid) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(service = "catalog", event = "signal_unavailable", error = %e, "cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    // the in-memory backend loses its records from here on
    info!(service = "catalog", event = "shutdown_signal", %service_id, "Ctrl+C received, draining connections");
}

fn main() -> ExitCode {
    init_logging();

    let service_id = Uuid::new_v4();
    let pid = std::process::id();

    std::panic::set_hook(Box::new(move |info| {
        error!(service = "catalog", event = "panic", %service_id, pid, message = %info, "unhandled panic");
    }));

    // Read once here only for the runtime size; server::run reads it again
    // and owns the rest.
    let worker_threads = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg.server.worker_threads,
        Err(e) => {
            error!(service = "catalog", event = "config_invalid", error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(threads) = worker_threads {
        builder.worker_threads(threads);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "catalog", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "catalog",
        event = "start",
        %service_id,
        pid,
        version = env!("CARGO_PKG_VERSION"),
        threads = ?worker_threads,
        "freelancer catalog starting"
    );

    rt.block_on(async move {
        match server::run(shutdown_signal(service_id)).await {
            Ok(()) => {
                info!(service = "catalog", event = "stop", %service_id, pid, "stopped");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = "catalog", event = "run_failed", %service_id, error = %e, "server exited with error");
                ExitCode::FAILURE
            }
        }
    })
}
