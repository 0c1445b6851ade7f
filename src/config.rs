use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_URL: &str = "https://www.rochester.edu/parking/mobile/lots.php";
pub const DEFAULT_DB_FILE: &str = "parking.db";

/// Everything the monitor needs to know, fixed for the life of the process.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub url: String,
    /// Single query parameter sent with every request.
    pub query: (String, String),
    pub db_path: PathBuf,
    /// Wait between cycles. The first fetch happens one interval after start.
    pub interval: Duration,
    /// Upper bound on a single request, connect through body.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            query: ("campus".to_string(), "URMC".to_string()),
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            interval: Duration::from_secs(60 * 5),
            timeout: Duration::from_secs(30),
            user_agent: format!("lot-monitor/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
