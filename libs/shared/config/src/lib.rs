use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let host = env::var("MEDIWELL_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("MEDIWELL_PORT")
            .ok()
            .and_then(|raw| match raw.parse::<u16>() {
                Ok(port) => Some(port),
                Err(_) => {
                    warn!("MEDIWELL_PORT is not a valid port number, using default");
                    None
                }
            })
            .unwrap_or(3000);

        Self { host, port }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
