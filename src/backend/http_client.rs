use reqwest::Client;
use std::time::Duration;

/// Browser-like agent; the endpoints reject obvious bots.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

pub fn build_backend_client() -> Client {
    build_backend_client_with_timeout(120)
}

pub fn build_backend_client_with_timeout(timeout_secs: u64) -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|_| Client::new())
}
