//! Server configuration from command-line flags and environment variables.

use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default number of pooled database connections.
pub const DEFAULT_POOL_SIZE: u32 = 10;

/// Settings for the `taskflow-server` binary.
///
/// Every flag can also be supplied through the environment variable named
/// in its help text.
#[derive(Debug, Clone, Parser)]
#[command(version, about = "Serve the taskflow HTTP API", name = "taskflow-server")]
pub struct ServerConfig {
    /// `PostgreSQL` connection string.
    #[arg(long, env = "TASKFLOW_DATABASE_URL")]
    pub database_url: String,

    /// Address to bind.
    #[arg(long, env = "TASKFLOW_HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// Port to bind.
    #[arg(long, env = "TASKFLOW_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Maximum number of pooled database connections.
    #[arg(long, env = "TASKFLOW_POOL_SIZE", default_value_t = DEFAULT_POOL_SIZE)]
    pub pool_size: u32,

    /// Log filter directive, for example `taskflow=debug,tower_http=info`.
    #[arg(long, env = "TASKFLOW_LOG", default_value = "info")]
    pub log_filter: String,

    /// Create the task tables on startup when they are missing.
    #[arg(long, env = "TASKFLOW_APPLY_SCHEMA")]
    pub apply_schema: bool,
}

impl ServerConfig {
    /// Socket address to listen on.
    #[must_use]
    pub const fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
