/// A thin wrapper around `reqwest::Client` with a preconfigured base URL.
///
/// Used for all REST calls towards the spacecraft backend (attitude and camera).
#[derive(Debug)]
pub(crate) struct HTTPClient {
    /// The underlying `reqwest::Client` used to perform HTTP requests.
    client: reqwest::Client,
    /// Base URL for the API, prepended to all endpoint paths.
    base_url: String,
}

impl HTTPClient {
    /// Timeout of a single request. Long-running captures are bounded separately.
    const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

    /// Constructs a new `HTTPClient` for the given base URL.
    ///
    /// # Errors
    /// Returns the `reqwest` error if the TLS backend or resolver cannot be initialized.
    pub(crate) fn new(base_url: &str) -> Result<HTTPClient, reqwest::Error> {
        Self::with_timeout(base_url, Self::REQUEST_TIMEOUT)
    }

    /// Like [`HTTPClient::new`] but with a custom per-request timeout.
    ///
    /// # Errors
    /// See [`HTTPClient::new`].
    pub(crate) fn with_timeout(base_url: &str, timeout: std::time::Duration) -> Result<HTTPClient, reqwest::Error> {
        Ok(HTTPClient {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns a reference to the internal `reqwest::Client`.
    pub(super) fn client(&self) -> &reqwest::Client { &self.client }
    /// Returns the base URL that the client was initialized with.
    pub(crate) fn url(&self) -> &str { self.base_url.as_str() }
}
