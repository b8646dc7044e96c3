//! Campus wayfinding HTTP server

mod api;
mod config;
mod error;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use wayfinder_core::{LoadOptions, Planner};

use crate::config::{Config, Overrides};
use crate::error::ServerError;

#[derive(Parser, Debug)]
#[command(name = "wayfinder-server", version, about = "Campus route planner over HTTP")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:8080
    #[arg(long)]
    bind: Option<String>,

    /// Campus graph JSON file
    #[arg(long)]
    graph: Option<PathBuf>,

    /// Background map image served at /planner/campus-map
    #[arg(long)]
    map_image: Option<PathBuf>,

    /// Refuse to start when the graph has malformed items
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ServerError> {
    let args = Args::parse();
    let config = Config::load(
        args.config.as_deref(),
        Overrides {
            bind: args.bind,
            graph_path: args.graph,
            map_image_path: args.map_image,
            strict_load: args.strict,
        },
    )?;
    logging::init(&config.logging.filter)?;

    let options = LoadOptions {
        strict: config.planner.strict_load,
    };
    let planner = Planner::load(&config.planner.graph_path, &options)?
        .with_leg_search(config.planner.leg_search);
    tracing::info!(
        graph = %config.planner.graph_path.display(),
        nodes = planner.graph().node_count(),
        edges = planner.graph().edge_count(),
        buildings = planner.graph().building_count(),
        diagnostics = planner.graph().diagnostics().len(),
        leg_search = ?planner.leg_search(),
        "campus graph loaded"
    );
    // build the walking graph before the first request arrives
    planner.adjacency();

    let app = api::build_router(
        Arc::new(planner),
        &config.planner.map_image_path,
        config.server.max_concurrent_requests,
    );

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
