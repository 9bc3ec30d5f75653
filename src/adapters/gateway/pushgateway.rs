//! Pushgateway HTTP Client - Snapshot Upload via reqwest
//!
//! Issues `PUT {base}/metrics/job/{job}/{label}/{value}...` with the
//! text-format snapshot as body. Each path segment is percent-encoded,
//! so job names with spaces (`shop web.1`) survive intact. Every
//! request is bounded by the configured push timeout.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use tracing::debug;

use crate::config::PushConfig;
use crate::domain::PushJob;
use crate::ports::{MetricsGateway, PushError};

/// reqwest-backed [`MetricsGateway`] for a Prometheus Pushgateway.
pub struct PushgatewayClient {
    /// Underlying HTTP client (timeout baked in).
    http: Client,
    /// Gateway base URL.
    base_url: Url,
    /// Basic-auth username and optional password.
    auth: Option<(String, Option<String>)>,
}

impl PushgatewayClient {
    /// Build a client from push settings.
    ///
    /// # Errors
    /// Fails when no URL is configured, the URL is not an absolute
    /// http(s) URL, or the HTTP client cannot be built.
    pub fn new(config: &PushConfig) -> Result<Self, PushError> {
        let raw = config.url.as_deref().ok_or_else(|| PushError::InvalidUrl {
            url: String::new(),
            reason: "PROMETHEUS_PUSH_URL is not set".to_string(),
        })?;

        let base_url = parse_base_url(raw)?;

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PushError::Transport(e.to_string()))?;

        let auth = config
            .auth
            .username
            .clone()
            .map(|user| (user, config.auth.password.clone()));

        Ok(Self {
            http,
            base_url,
            auth,
        })
    }

    /// Full push URL for a job and its groupings.
    pub fn push_url(&self, job: &PushJob) -> Result<Url, PushError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| PushError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?;
            segments.pop_if_empty();
            segments.push("metrics").push("job").push(&job.name);
            for (label, value) in &job.groupings {
                segments.push(label).push(value);
            }
        }
        Ok(url)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, PushError> {
    let invalid = |reason: String| PushError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be a base".to_string()));
    }
    Ok(url)
}

#[async_trait]
impl MetricsGateway for PushgatewayClient {
    async fn push(&self, job: &PushJob, body: Vec<u8>) -> Result<(), PushError> {
        let url = self.push_url(job)?;

        let mut request = self
            .http
            .put(url.clone())
            .header(CONTENT_TYPE, prometheus::TEXT_FORMAT)
            .body(body);

        if let Some((user, pass)) = &self.auth {
            request = request.basic_auth(user, pass.as_ref());
        }

        let response = request
            .send()
            .await
            .map_err(|e| PushError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PushError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(url = %url, status = %status, "Metrics pushed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::CredentialConfig;

    fn push_config(url: Option<&str>) -> PushConfig {
        PushConfig {
            enabled: true,
            url: url.map(str::to_string),
            auth: CredentialConfig::default(),
            interval: Duration::from_secs(10),
            timeout: Duration::from_secs(5),
        }
    }

    fn job(name: &str, groupings: &[(&str, &str)]) -> PushJob {
        PushJob {
            name: name.to_string(),
            groupings: groupings
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_push_url_layout() {
        let client = PushgatewayClient::new(&push_config(Some("https://push.example.com"))).unwrap();
        let url = client
            .push_url(&job("web.1", &[("stage", "dev"), ("heroku_dyno_type", "web.1")]))
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://push.example.com/metrics/job/web.1/stage/dev/heroku_dyno_type/web.1"
        );
    }

    #[test]
    fn test_push_url_encodes_segments_and_keeps_prefix() {
        let client =
            PushgatewayClient::new(&push_config(Some("http://gw.internal:9091/prefix/"))).unwrap();
        let url = client.push_url(&job("shop web.1", &[("stage", "a/b")])).unwrap();

        assert_eq!(
            url.as_str(),
            "http://gw.internal:9091/prefix/metrics/job/shop%20web.1/stage/a%2Fb"
        );
    }

    #[test]
    fn test_rejects_missing_or_bad_url() {
        assert!(matches!(
            PushgatewayClient::new(&push_config(None)),
            Err(PushError::InvalidUrl { .. })
        ));
        assert!(matches!(
            PushgatewayClient::new(&push_config(Some("not a url"))),
            Err(PushError::InvalidUrl { .. })
        ));
        assert!(matches!(
            PushgatewayClient::new(&push_config(Some("mailto:ops@example.com"))),
            Err(PushError::InvalidUrl { .. })
        ));
    }
}
