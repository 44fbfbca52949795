pub mod dto;

use async_trait::async_trait;
use reqwest::{Client, header};
use tracing::{debug, error};

use crate::config::AppConfig;
use crate::error::{AppError, GatewayError};
use crate::models::{Building, Position};

pub const AVAILABILITY_PATH: &str = "/api/open-classrooms";

const TRANSPORT_FAILURE: &str = "Failed to process request";

#[async_trait]
pub trait AvailabilityGateway: Send + Sync {
    /// `Some(position)` is sent as a POST with `{lat, lng}`, `None` as an uncached GET.
    async fn fetch_availability(&self, position: Option<Position>) -> Result<Vec<Building>, GatewayError>;
}

pub struct HttpGateway {
    client: Client,
    endpoint: String,
    verbose_errors: bool,
}

impl HttpGateway {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.upstream_timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: config.endpoint(AVAILABILITY_PATH),
            verbose_errors: config.verbose_upstream_errors,
        })
    }

    fn upstream_error(&self, status: reqwest::StatusCode) -> GatewayError {
        let message = if self.verbose_errors {
            format!(
                "Failed to fetch data: {}",
                status.canonical_reason().unwrap_or("Unknown status")
            )
        } else {
            "Failed to fetch data".to_string()
        };
        GatewayError::Upstream {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl AvailabilityGateway for HttpGateway {
    async fn fetch_availability(&self, position: Option<Position>) -> Result<Vec<Building>, GatewayError> {
        let request = match position {
            Some(position) => self
                .client
                .post(&self.endpoint)
                .json(&dto::UpstreamLocationBody::from(position)),
            None => self
                .client
                .get(&self.endpoint)
                .header(header::ACCEPT, "application/json")
                .header(header::CACHE_CONTROL, "no-cache"),
        };
        let method = if position.is_some() { "POST" } else { "GET" };

        let response = request.send().await.map_err(|e| {
            error!("{} {} failed: {}", method, self.endpoint, e);
            GatewayError::Transport(TRANSPORT_FAILURE.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            error!("Backend responded with status: {}", status);
            return Err(self.upstream_error(status));
        }

        let body_text = response.text().await.map_err(|e| {
            error!("Failed to read backend body: {}", e);
            GatewayError::Transport(TRANSPORT_FAILURE.to_string())
        })?;

        let buildings = Building::parse_list(&body_text).map_err(|e| {
            error!("Failed to parse backend response: {}", e);
            GatewayError::Transport(TRANSPORT_FAILURE.to_string())
        })?;

        debug!("{} {} returned {} buildings", method, self.endpoint, buildings.len());
        Ok(buildings)
    }
}

/// Always answers with the same result.
pub struct FixedGateway {
    result: Result<Vec<Building>, GatewayError>,
}

impl FixedGateway {
    pub fn ok(buildings: Vec<Building>) -> Self {
        Self { result: Ok(buildings) }
    }

    pub fn failing(error: GatewayError) -> Self {
        Self { result: Err(error) }
    }
}

#[async_trait]
impl AvailabilityGateway for FixedGateway {
    async fn fetch_availability(&self, _position: Option<Position>) -> Result<Vec<Building>, GatewayError> {
        self.result.clone()
    }
}
