use common::utils::logging::{init_logging, LogFormat};
use configs::AppConfig;
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn init_tracing(cfg: Option<&AppConfig>) {
    let format = match cfg.map(|c| c.log.format.parse::<LogFormat>()) {
        Some(Ok(f)) => f,
        Some(Err(_)) | None => LogFormat::default(),
    };
    init_logging(format);
    info!(service = "server", event = "logger_init", ?format, "tracing subscriber initialized");
}

fn main() -> std::process::ExitCode {
    // load .env before anything reads RUST_LOG or the config fallbacks
    dotenv().ok();

    let cfg = AppConfig::load();
    init_tracing(cfg.as_ref().ok());
    let cfg = match cfg {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "server", event = "config_invalid", error = %e, "invalid configuration");
            return std::process::ExitCode::FAILURE;
        }
    };

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "server",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let worker_threads = cfg.server.worker_threads;
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads {
        builder.worker_threads(w);
    }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "server", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "server",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        seed_sample = cfg.store.seed_sample,
        "server service starting"
    );

    rt.block_on(async move {
        let server_task = tokio::spawn(server::run(cfg));
        match server_task.await {
            Ok(Ok(())) => {
                info!(service = "server", event = "stop", %service_id, pid, "server stopped normally");
                std::process::ExitCode::SUCCESS
            }
            Ok(Err(e)) => {
                error!(service = "server", event = "run_failed", error = %e, "server::run returned error");
                std::process::ExitCode::FAILURE
            }
            Err(e) => {
                error!(service = "server", event = "task_join_error", error = %e, "server task join error");
                std::process::ExitCode::FAILURE
            }
        }
    })
}
