//! HTTP implementation of the satellite-data service contract
use super::RemoteSatelliteClient;
use crate::config::ServiceConfig;
use crate::error::{ClientError, ClientResult};
use anyhow::Context;
use async_trait::async_trait;
use orbview_common::{LookupPayload, NoradId, Registration, TrajectoryDocument, Visibility};
use reqwest::{StatusCode, Url};
use std::time::Duration;

const MAX_ERROR_BODY_CHARS: usize = 200;

const OP_LOOKUP: &str = "lookup";
const OP_REGISTER: &str = "fetch-and-save";
const OP_TRAJECTORY: &str = "trajectory";
const OP_VISIBILITY: &str = "visible-check";

/// reqwest-backed client; cheap to clone, shares one connection pool.
#[derive(Debug, Clone)]
pub struct HttpSatelliteClient {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpSatelliteClient {
    pub fn new(config: &ServiceConfig) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid service base_url '{}'", config.base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Service base_url '{}' cannot carry a path", config.base_url);
        }

        let timeout = config.request_timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        tracing::info!("Satellite service client targeting {}", base_url);

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// `{base_url}/satellite/{segments...}`
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("satellite").extend(segments);
        }
        url
    }

    fn transport_error(&self, operation: &'static str, error: reqwest::Error) -> ClientError {
        if error.is_timeout() {
            ClientError::Timeout {
                operation,
                after: self.timeout,
            }
        } else {
            ClientError::Transport {
                operation,
                message: error.to_string(),
            }
        }
    }

    /// Single GET; non-success statuses become [`ClientError::Status`].
    async fn get(&self, operation: &'static str, url: Url) -> ClientResult<reqwest::Response> {
        tracing::debug!(operation, %url, "Sending request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(operation, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Status {
            operation,
            status: status.as_u16(),
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        operation: &'static str,
        url: Url,
    ) -> ClientResult<T> {
        let response = self.get(operation, url).await?;
        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                self.transport_error(operation, e)
            } else {
                ClientError::Decode {
                    operation,
                    message: e.to_string(),
                }
            }
        })
    }
}

#[async_trait]
impl RemoteSatelliteClient for HttpSatelliteClient {
    async fn lookup(&self, id: NoradId) -> ClientResult<LookupPayload> {
        let url = self.endpoint(&[&id.to_string(), "tle"]);
        match self.get_json(OP_LOOKUP, url).await {
            Err(ClientError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(ClientError::NotRegistered(id))
            }
            other => other,
        }
    }

    async fn register_and_lookup(&self, id: NoradId) -> ClientResult<Registration> {
        let url = self.endpoint(&["fetch-and-save", &id.to_string()]);
        self.get_json(OP_REGISTER, url).await
    }

    async fn trajectory(&self, id: NoradId) -> ClientResult<TrajectoryDocument> {
        let url = self.endpoint(&[&id.to_string(), "czml"]);
        self.get_json(OP_TRAJECTORY, url).await
    }

    async fn check_visibility(&self, a: NoradId, b: NoradId) -> ClientResult<Visibility> {
        let url = self.endpoint(&[&a.to_string(), &b.to_string(), "visible-check"]);
        let response = self.get(OP_VISIBILITY, url).await?;
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(OP_VISIBILITY, e))?;

        Visibility::from_reply(&text).map_err(|e| ClientError::Decode {
            operation: OP_VISIBILITY,
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(base_url: &str) -> HttpSatelliteClient {
        let config = ServiceConfig {
            base_url: base_url.to_string(),
            ..ServiceConfig::default()
        };
        HttpSatelliteClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_layout() {
        let client = client_for("http://localhost:8080/api");
        assert_eq!(
            client.endpoint(&["25544", "tle"]).as_str(),
            "http://localhost:8080/api/satellite/25544/tle"
        );
        assert_eq!(
            client.endpoint(&["fetch-and-save", "25544"]).as_str(),
            "http://localhost:8080/api/satellite/fetch-and-save/25544"
        );
        assert_eq!(
            client.endpoint(&["25544", "48274", "visible-check"]).as_str(),
            "http://localhost:8080/api/satellite/25544/48274/visible-check"
        );
    }

    #[test]
    fn test_endpoint_with_trailing_slash() {
        let client = client_for("http://localhost:8080/api/");
        assert_eq!(
            client.endpoint(&["1", "czml"]).as_str(),
            "http://localhost:8080/api/satellite/1/czml"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        let config = ServiceConfig {
            base_url: "mailto:ops@example.com".to_string(),
            ..ServiceConfig::default()
        };
        assert!(HttpSatelliteClient::new(&config).is_err());
    }
}
