use std::time::Duration;

/// Default robot host name.
pub const DEFAULT_HOST: &str = "almond-bot.local";

/// Default robot port.
pub const DEFAULT_PORT: u16 = 8000;

/// Path of the JSON-RPC WebSocket endpoint on the server.
pub const ENDPOINT_PATH: &str = "/ws";

/// Client connection settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Host name or address of the robot server.
    pub host: String,
    /// Port of the robot server.
    pub port: u16,
    /// Per-call deadline. `None` waits indefinitely.
    pub call_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Configuration for a specific endpoint, no call timeout.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            call_timeout: None,
        }
    }

    /// Set the per-call deadline.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// The WebSocket URL this configuration points at.
    pub fn url(&self) -> String {
        format!("ws://{}:{}{}", self.host, self.port, ENDPOINT_PATH)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoint() {
        let config = ClientConfig::default();
        assert_eq!(config.url(), "ws://almond-bot.local:8000/ws");
        assert!(config.call_timeout.is_none());
    }

    #[test]
    fn explicit_endpoint_and_timeout() {
        let config =
            ClientConfig::new("10.0.0.5", 9100).with_call_timeout(Duration::from_secs(2));
        assert_eq!(config.url(), "ws://10.0.0.5:9100/ws");
        assert_eq!(config.call_timeout, Some(Duration::from_secs(2)));
    }
}
