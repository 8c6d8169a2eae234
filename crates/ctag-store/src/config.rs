/// Default coordination endpoint.
pub const DEFAULT_ENDPOINT: &str = "localhost:4001";

/// Default number of leader redirects followed per request.
pub const DEFAULT_MAX_REDIRECTS: u32 = 10;

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// `host[:port]` or a full `http(s)://` URL.
    pub endpoint: String,
    pub max_redirects: u32,
}

impl StoreConfig {
    /// Endpoint with an explicit scheme and no trailing slash.
    pub fn base_url(&self) -> String {
        let endpoint = self.endpoint.trim().trim_end_matches('/');
        if endpoint.contains("://") {
            endpoint.to_string()
        } else {
            format!("http://{endpoint}")
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}
