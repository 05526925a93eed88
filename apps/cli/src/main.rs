mod args;
mod config;
mod dirs;

use std::io;
use std::net::SocketAddr;

use app_api::{AppContext, RangeRequest};
use args::Command;
use cohort_app::{AppConfig, AppPaths, AppState, ensure_app_data_dir};
use http_api::HttpState;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}

fn print_json<T: Serialize>(value: &T) -> Result<(), io::Error> {
    let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    println!("{text}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = args::parse_args().map_err(|err| {
        eprintln!("{err}");
        args::print_help();
        io::Error::new(io::ErrorKind::InvalidInput, "invalid arguments")
    })?;
    init_tracing();

    let config = config::load_or_create().map_err(io::Error::other)?;
    if config.created {
        info!(
            path = %config.paths.file.display(),
            port = config.config.port,
            "created default config"
        );
    }

    let data_dir = dirs::resolve_data_dir(args.data_dir.as_deref()).map_err(io::Error::other)?;
    let import_dir = args
        .import_dir
        .clone()
        .or_else(|| config.config.import_dir.clone())
        .map(|path| dirs::expand_home_path(&path));
    let paths = AppPaths::new(data_dir.clone()).with_import_dir(import_dir);
    ensure_app_data_dir(&paths).map_err(|err| io::Error::other(err.to_string()))?;
    info!(
        data_dir = %paths.app_data_dir.display(),
        import_dir = %paths.import_dir.display(),
        "using directories"
    );

    let app_state = AppState::new(AppConfig {
        db_path: paths.db_path.clone(),
        import_dir: paths.import_dir.clone(),
        policy: config.config.policy,
    });
    if let Err(err) = app_state.setup_db() {
        return Err(io::Error::other(format!("failed to initialize database: {}", err)).into());
    }
    let context = AppContext {
        app_state,
        app_data_dir: data_dir,
    };

    match args.command {
        Command::Ingest => {
            let stats = app_api::ingest(&context).map_err(|err| io::Error::other(err.to_string()))?;
            print_json(&stats)?;
        }
        Command::Build => {
            app_api::ingest(&context).map_err(|err| io::Error::other(err.to_string()))?;
            let req = app_api::AdWeeksRequest {
                range: RangeRequest {
                    since: args.since.clone(),
                    until: args.until.clone(),
                    lookback_days: None,
                },
                rebuild: Some(true),
                cohort_week: None,
            };
            let response =
                app_api::ad_weeks(&context, req).map_err(|err| io::Error::other(err.to_string()))?;
            print_json(&response)?;
        }
        Command::Grid => {
            let grid =
                app_api::cohort_grid(&context).map_err(|err| io::Error::other(err.to_string()))?;
            print_json(&grid)?;
        }
        Command::Serve => {
            let port = args.port.unwrap_or(config.config.port);
            serve(context, port).await?;
        }
    }
    Ok(())
}

async fn serve(context: AppContext, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let ingest_state = context.app_state.clone();
    tokio::task::spawn_blocking(move || match ingest_state.refresh_data() {
        Ok(stats) => info!(
            rows = stats.rows_upserted,
            files = stats.files_scanned,
            "startup ingest finished"
        ),
        Err(err) => warn!(error = %err, "failed to refresh data on startup"),
    });

    let router = http_api::router(HttpState::new(context));
    let (listener, actual_port, used_fallback) = bind_port(port).await?;
    if used_fallback {
        warn!(
            configured = port,
            actual = actual_port,
            "configured port was unavailable; using a fallback for this run"
        );
    }

    println!("Cohort Tracker is running at http://127.0.0.1:{actual_port}");
    println!("Press Ctrl+C to stop.");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn bind_port(port: u16) -> Result<(tokio::net::TcpListener, u16, bool), io::Error> {
    if port == 0 {
        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let actual_port = listener.local_addr()?.port();
        return Ok((listener, actual_port, false));
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => Ok((listener, port, false)),
        Err(_) => {
            let listener =
                tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
            let actual_port = listener.local_addr()?.port();
            Ok((listener, actual_port, true))
        }
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down");
}
