use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;

// Generation calls can legitimately take tens of seconds at high token
// limits; the connect timeout stays short so a dead endpoint fails fast.
const HTTP_REQUEST_TIMEOUT_SECS: u64 = 60;
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .build()
        .expect("Failed to build HTTP client")
});

pub fn get_http_client() -> &'static Client {
    &HTTP_CLIENT
}
