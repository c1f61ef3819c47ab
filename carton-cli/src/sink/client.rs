//! HTTP client for the sheet sink endpoint

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use super::error::SinkError;
use super::models::{Ack, Envelope, LatestTracking, LatestTrackingResponse, MlResponse};
use super::Sink;
use crate::reconcile::Table;

/// Sink reached over HTTP at a single endpoint URL
#[derive(Debug, Clone)]
pub struct HttpSink {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpSink {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SinkError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SinkError::Transport)?;
        Ok(Self::with_client(client, url, timeout))
    }

    pub fn with_client(client: Client, url: impl Into<String>, timeout: Duration) -> Self {
        HttpSink {
            client,
            url: url.into(),
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Read back the scaled table stored for a target sheet
    pub async fn fetch_ml(&self, sheet_id: &str) -> Result<Table, SinkError> {
        let response: MlResponse = self
            .get_json(&[("action", "ml"), ("sheetId", sheet_id)])
            .await?;
        if !response.ok {
            return Err(SinkError::Rejected(
                response
                    .error
                    .unwrap_or_else(|| "ml read returned ok=false".to_string()),
            ));
        }
        Ok(response.data.unwrap_or_default())
    }

    /// Look up the most recent tracking workbook known to the sink
    pub async fn latest_tracking(&self) -> Result<LatestTracking, SinkError> {
        let response: LatestTrackingResponse =
            self.get_json(&[("action", "latestSuivi")]).await?;
        if !response.ok {
            return Err(SinkError::Rejected(
                response
                    .error
                    .unwrap_or_else(|| "latestSuivi returned ok=false".to_string()),
            ));
        }
        Ok(response.latest.unwrap_or_default())
    }

    async fn get_json<T: DeserializeOwned>(&self, query: &[(&str, &str)]) -> Result<T, SinkError> {
        let request = self.client.get(&self.url).query(query);
        let (status, body) = self.execute(request).await?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        serde_json::from_str(&body).map_err(|e| SinkError::Decode(e.to_string()))
    }

    /// Send a request and read its body under one overall deadline
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<(StatusCode, String), SinkError> {
        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Err(_) => Err(SinkError::Timeout(self.timeout)),
            Ok(Err(e)) => Err(SinkError::from_reqwest(e, self.timeout)),
            Ok(Ok(result)) => Ok(result),
        }
    }
}

#[async_trait]
impl Sink for HttpSink {
    async fn submit(&self, envelope: &Envelope) -> Result<Ack, SinkError> {
        log::debug!("POST {} ({} result rows)", self.url, envelope.resultats.rows.len());
        let request = self.client.post(&self.url).json(envelope);
        let (status, body) = self.execute(request).await?;

        if !status.is_success() {
            log::error!("Sink responded with HTTP {}: {}", status, body);
            return Err(status_error(status, &body));
        }

        let ack = Ack::from_body(&body);
        if ack.is_rejection() {
            return Err(SinkError::Rejected(
                ack.error
                    .clone()
                    .unwrap_or_else(|| "sink returned ok=false".to_string()),
            ));
        }
        Ok(ack)
    }
}

fn status_error(status: StatusCode, body: &str) -> SinkError {
    let message = Ack::from_body(body)
        .error
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
    SinkError::Status {
        status: status.as_u16(),
        message,
    }
}
