//! Server tuning knobs, filled from the command line in `main.rs`.

use std::time::Duration;

pub const DEFAULT_DRAW_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_CLIENTS: usize = 64;
pub const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Time between automatic draws while a round is running
    pub draw_interval: Duration,
    /// Connections beyond this are turned away with "Server full"
    pub max_clients: usize,
    /// Silence after which a connection is dropped
    pub client_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            draw_interval: DEFAULT_DRAW_INTERVAL,
            max_clients: DEFAULT_MAX_CLIENTS,
            client_timeout: DEFAULT_CLIENT_TIMEOUT,
        }
    }
}

impl ServerConfig {
    pub fn with_draw_interval(mut self, draw_interval: Duration) -> Self {
        self.draw_interval = draw_interval;
        self
    }

    pub fn with_max_clients(mut self, max_clients: usize) -> Self {
        self.max_clients = max_clients;
        self
    }

    pub fn with_client_timeout(mut self, client_timeout: Duration) -> Self {
        self.client_timeout = client_timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.draw_interval, Duration::from_secs(5));
        assert_eq!(config.max_clients, 64);
        assert_eq!(config.client_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_builders() {
        let config = ServerConfig::default()
            .with_draw_interval(Duration::from_millis(250))
            .with_max_clients(4)
            .with_client_timeout(Duration::from_secs(1));

        assert_eq!(config.draw_interval, Duration::from_millis(250));
        assert_eq!(config.max_clients, 4);
        assert_eq!(config.client_timeout, Duration::from_secs(1));
    }
}
