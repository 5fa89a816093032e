use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use std::time::Duration;
use url::Url;

/// Browser-like agent; the Yahoo chart endpoint rejects requests without one.
const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (X11; Linux x86_64) dowcast/",
    env!("CARGO_PKG_VERSION")
);

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates the shared HTTP client.
    ///
    /// No retry middleware is installed: a failed call surfaces to the user
    /// immediately and the next action starts fresh.
    pub fn create_client(timeout: Duration) -> ClientWithMiddleware {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(5)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        ClientBuilder::new(client).build()
    }
}

/// Joins `path` onto `base_url` and appends the query parameters, percent-encoded.
pub fn build_url_with_query<K, V>(
    base_url: &str,
    path: &str,
    params: &[(K, V)],
) -> Result<Url, url::ParseError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse_with_params(
        &joined,
        params.iter().map(|(k, v)| (k.as_ref(), v.as_ref())),
    )
}
