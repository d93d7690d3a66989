use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:3000")
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Base URL of the upstream console service (e.g., "http://jenkins-console:5000")
    pub console_api_url: String,

    /// Request timeout for console service calls, in seconds
    #[serde(default = "default_console_timeout_secs")]
    pub console_timeout_secs: u64,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_console_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    pub fn console_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.console_timeout_secs)
    }
}
