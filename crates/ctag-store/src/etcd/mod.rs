mod envelope;

use async_trait::async_trait;
use reqwest::{StatusCode, Url, header::LOCATION, redirect::Policy};
use tracing::{debug, trace};

use crate::config::StoreConfig;
use crate::errors::StoreError;
use crate::store::{CreateOutcome, ReadOutcome, SlotStore};
use envelope::Envelope;

/// Client for the etcd v2 keys API.
///
/// Redirects are never followed by the HTTP layer itself: every request goes through
/// [`EtcdClient::send`], which re-issues the request against the `Location` of a
/// `307 Temporary Redirect` at most `max_redirects` times.
pub struct EtcdClient {
    http: reqwest::Client,
    keys_url: String,
    max_redirects: u32,
}

impl EtcdClient {
    pub fn new(cfg: &StoreConfig) -> Result<Self, StoreError> {
        let keys_url = format!("{}/v2/keys", cfg.base_url());
        Url::parse(&keys_url).map_err(|e| StoreError::InvalidEndpoint(format!("{keys_url}: {e}")))?;

        let http = reqwest::Client::builder().redirect(Policy::none()).build()?;
        Ok(Self {
            http,
            keys_url,
            max_redirects: cfg.max_redirects,
        })
    }

    fn key_url(&self, key: &str) -> Result<Url, StoreError> {
        let raw = if key.starts_with('/') {
            format!("{}{}", self.keys_url, key)
        } else {
            format!("{}/{}", self.keys_url, key)
        };
        Url::parse(&raw).map_err(|e| StoreError::InvalidEndpoint(format!("{raw}: {e}")))
    }

    /// Send a request, following leader redirects up to the configured bound.
    async fn send<F>(&self, key: &str, mut url: Url, build: F) -> Result<reqwest::Response, StoreError>
    where
        F: Fn(&reqwest::Client, Url) -> reqwest::RequestBuilder,
    {
        let mut redirects = 0;
        loop {
            trace!(target: "ctag.store", %url, redirects, "sending");
            let response = build(&self.http, url.clone()).send().await?;
            trace!(target: "ctag.store", status = %response.status(), "reply");

            if response.status() != StatusCode::TEMPORARY_REDIRECT {
                return Ok(response);
            }
            if redirects >= self.max_redirects {
                return Err(StoreError::TooManyRedirects {
                    max: self.max_redirects,
                    key: key.to_string(),
                });
            }

            let next = redirect_target(&response)?;
            debug!(from = %url, to = %next, "following redirect to store leader");
            redirects += 1;
            url = next;
        }
    }
}

#[async_trait]
impl SlotStore for EtcdClient {
    async fn read(&self, key: &str) -> Result<ReadOutcome, StoreError> {
        let url = self.key_url(key)?;
        let response = self.send(key, url, |http, url| http.get(url)).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(ReadOutcome::NotFound),
            StatusCode::OK => {
                let body = response.text().await?;
                trace!(target: "ctag.store", %body, "body");
                let envelope: Envelope = serde_json::from_str(&body).map_err(|e| {
                    StoreError::InvalidResponse(format!(
                        "failed to parse response: {}, body: {}",
                        e, body
                    ))
                })?;
                trace!(target: "ctag.store", action = %envelope.action, node = %envelope.node.key, "parsed");
                Ok(ReadOutcome::Found(envelope.node.value.unwrap_or_default()))
            }
            status => Err(unexpected(status, &response)),
        }
    }

    async fn create_if_absent(&self, key: &str, value: &str) -> Result<CreateOutcome, StoreError> {
        let mut url = self.key_url(key)?;
        url.query_pairs_mut().append_pair("prevExist", "false");

        let form = [("value", value)];
        let response = self
            .send(key, url, |http, url| http.put(url).form(&form))
            .await?;

        match response.status() {
            StatusCode::CREATED => Ok(CreateOutcome::Created),
            StatusCode::PRECONDITION_FAILED => Ok(CreateOutcome::AlreadyExists),
            status => Err(unexpected(status, &response)),
        }
    }
}

fn redirect_target(response: &reqwest::Response) -> Result<Url, StoreError> {
    let location = response
        .headers()
        .get(LOCATION)
        .ok_or_else(|| StoreError::InvalidRedirect("missing Location header".into()))?
        .to_str()
        .map_err(|e| StoreError::InvalidRedirect(format!("unreadable Location header: {e}")))?;

    response
        .url()
        .join(location)
        .map_err(|e| StoreError::InvalidRedirect(format!("{location}: {e}")))
}

fn unexpected(status: StatusCode, response: &reqwest::Response) -> StoreError {
    StoreError::UnexpectedStatus {
        status: status.as_u16(),
        url: response.url().to_string(),
    }
}
