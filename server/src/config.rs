use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Parser;

/// Server settings, read from flags or the environment (`.env` included).
#[derive(Debug, Clone, Parser)]
#[command(name = "todo-server", version, about = "Server-rendered todo list")]
pub struct Config {
    /// SQLite database: a path, `sqlite://<path>`, or `:memory:`.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,
}

impl Config {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
