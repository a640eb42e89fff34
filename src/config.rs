use std::{env, net::SocketAddr};

pub const HABITS_PORT_VAR: &str = "PORT";
pub const HABITS_DEFAULT_PORT: u16 = 8080;
pub const METRICS_PORT_VAR: &str = "METRICS_PORT";
pub const METRICS_DEFAULT_PORT: u16 = 5001;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl ServerConfig {
    /// Reads the listen port from `port_var`, falling back to `default_port`
    /// when it is unset or not a valid port.
    pub fn from_env(port_var: &str, default_port: u16) -> Self {
        Self {
            port: parse_port(env::var(port_var).ok().as_deref(), default_port),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn parse_port(value: Option<&str>, default_port: u16) -> u16 {
    value
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(default_port)
}

/// Installs the fmt subscriber, honoring `RUST_LOG` on top of `info`.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();
    Ok(())
}
