mod access_log;
mod config;
mod cors;
mod server;
mod versions;

pub use config::ConfigError;
pub use config::ServerConfig;
pub use server::app;
pub use server::serve;
pub use server::VERSIONS_ROUTE;
pub use versions::scan_versions;
pub use versions::VersionList;
pub use versions::VersionScanError;
pub use versions::BASE_PATH;

const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
const GIT_VERSION: &str = git_version::git_version!(fallback = "unknown");
static VERSION: std::sync::OnceLock<String> = std::sync::OnceLock::new();
pub fn version() -> &'static str {
    VERSION
        .get_or_init(|| format!("{PKG_VERSION}-{GIT_VERSION}"))
        .as_str()
}
