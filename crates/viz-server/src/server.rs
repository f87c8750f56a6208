use std::net::SocketAddr;
use std::sync::Arc;

use poem::endpoint::StaticFilesEndpoint;
use poem::get;
use poem::handler;
use poem::http::Method;
use poem::listener::TcpListener;
use poem::middleware::AddData;
use poem::web::Data;
use poem::web::Json;
use poem::Body;
use poem::Endpoint;
use poem::EndpointExt;
use poem::IntoResponse;
use poem::Request;
use poem::Response;
use poem::Result;
use poem::Route;
use poem::Server;

use crate::access_log::with_logging;
use crate::config::ServerConfig;
use crate::cors::CorsHeaders;
use crate::versions::VersionList;
use crate::versions::VersionScanError;

pub const VERSIONS_ROUTE: &str = "/api/versions";

pub fn app(config: ServerConfig) -> impl Endpoint {
    let static_files = StaticFilesEndpoint::new(config.root.clone())
        .index_file("index.html")
        .redirect_to_slash_directory()
        .around(serve_head_as_get);

    Route::new()
        .at(VERSIONS_ROUTE, with_logging(get(list_versions), false))
        .nest("/", with_logging(static_files, true))
        .with(AddData::new(Arc::new(config)))
        .with(CorsHeaders)
}

pub async fn serve(server_addr: SocketAddr, config: ServerConfig) -> Result<(), std::io::Error> {
    let app = app(config);

    tracing::info!("Starting server at {}", server_addr);
    Server::new(TcpListener::bind(server_addr))
        .run_with_graceful_shutdown(
            app,
            async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!("Failed to listen for shutdown signal: {}", e);
                    std::future::pending::<()>().await;
                }
                tracing::info!("Server stopped by user");
            },
            None,
        )
        .await
}

/// `StaticFilesEndpoint` only answers GET; HEAD gets the same headers and no body.
async fn serve_head_as_get<E: Endpoint>(ep: Arc<E>, mut req: Request) -> Result<Response> {
    let head = req.method() == Method::HEAD;
    if head {
        req.set_method(Method::GET);
    }

    let mut resp = ep.call(req).await?.into_response();
    if head {
        resp.set_body(Body::empty());
    }
    Ok(resp)
}

/// Runs a directory scan on the blocking pool.
async fn run_scan<F>(scan: F) -> Result<VersionList, VersionScanError>
where
    F: FnOnce() -> Result<VersionList, VersionScanError> + Send + 'static,
{
    tokio::task::spawn_blocking(scan)
        .await
        .map_err(VersionScanError::from)
        .and_then(|scanned| scanned)
        .inspect_err(|e| tracing::error!("Version scan failed: {}", e))
}

#[handler]
async fn list_versions(config: Data<&Arc<ServerConfig>>) -> Result<Json<VersionList>> {
    let version_dir = config.version_dir();
    let list = run_scan(move || VersionList::scan(&version_dir)).await?;

    Ok(Json(list))
}
