use std::io::ErrorKind;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use tracing_subscriber::prelude::*;

fn parse_args() -> Command {
    Command::new("viz-server")
        .about("Development server for the schedule visualization frontend")
        .version(viz_server::version())
        .arg(
            Arg::new("ADDR")
                .long("addr")
                .env("VIZ_SERVER_ADDR")
                .num_args(1)
                .default_value("0.0.0.0:8080")
                .value_parser(value_parser!(SocketAddr))
                .action(ArgAction::Set)
                .help("Listen address"),
        )
        .arg(
            Arg::new("PROJECT_DIR")
                .long("project-dir")
                .env("VIZ_SERVER_PROJECT_DIR")
                .num_args(1)
                .default_value("./frontend")
                .value_parser(value_parser!(PathBuf))
                .action(ArgAction::Set)
                .help("Frontend directory; its parent becomes the serving root"),
        )
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(
                    tracing_subscriber::EnvFilter::builder()
                        .with_default_directive(
                            tracing_subscriber::filter::LevelFilter::INFO.into(),
                        )
                        .from_env_lossy(),
                ),
        )
        .init();

    let args = parse_args().get_matches();

    let addr = *args.get_one::<SocketAddr>("ADDR").unwrap();
    let project_dir = args.get_one::<PathBuf>("PROJECT_DIR").unwrap();

    let config = match viz_server::ServerConfig::from_project_dir(project_dir) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let port = addr.port();
    tracing::info!("Serving files from: {}", config.root.display());
    tracing::info!("Frontend URL: http://localhost:{}/frontend/", port);
    tracing::info!(
        "CSV files available at: http://localhost:{}{}/",
        port,
        viz_server::BASE_PATH
    );
    tracing::info!("Version list at: http://localhost:{}{}", port, viz_server::VERSIONS_ROUTE);

    if let Err(e) = viz_server::serve(addr, config).await {
        if e.kind() == ErrorKind::AddrInUse {
            tracing::error!(
                "Port {} is already in use. Close the other application or pass --addr.",
                port
            );
        } else {
            tracing::error!("Server error: {}", e);
        }
        std::process::exit(1);
    }
}
