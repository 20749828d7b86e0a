use std::sync::Arc;

use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{Reservation, Room};
use thiserror::Error;
use tracing::{debug, warn};

use crate::interceptor::{ErrorInterceptor, ResponseKind};
use crate::models::ListEnvelope;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("backend unreachable: {0}")]
    Network(#[source] reqwest::Error),
    #[error("backend responded with {status}")]
    Status { status: StatusCode, body: Vec<u8> },
    #[error("failed to decode backend response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Credentials presented to the backend on every request.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub access_token: Option<String>,
}

impl Credentials {
    pub fn new(access_token: Option<String>) -> Self {
        Self { access_token }
    }
}

#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    interceptor: Arc<ErrorInterceptor>,
}

impl BackendClient {
    pub fn new(
        base_url: impl Into<String>,
        credentials: Credentials,
        interceptor: ErrorInterceptor,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            credentials,
            interceptor: Arc::new(interceptor),
        }
    }

    pub async fn list_rooms(&self) -> Result<Vec<Room>, ClientError> {
        self.get_list("/rooms").await
    }

    pub async fn list_reservations(&self) -> Result<Vec<Reservation>, ClientError> {
        self.get_list("/reservations").await
    }

    pub async fn export_reservations(&self) -> Result<Vec<u8>, ClientError> {
        let request = self.http.get(self.url("/reservations/export"));
        let response = self.send(request, ResponseKind::Binary).await?;
        let bytes = response.bytes().await.map_err(ClientError::Decode)?;
        Ok(bytes.to_vec())
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ClientError> {
        let request = self
            .http
            .get(self.url(path))
            .header(ACCEPT, "application/json");
        let response = self.send(request, ResponseKind::Json).await?;
        let envelope = response
            .json::<ListEnvelope<Value>>()
            .await
            .map_err(ClientError::Decode)?;

        let items = envelope
            .into_items()
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<T>(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping unreadable record from {}: {}", path, e);
                    None
                }
            })
            .collect();
        Ok(items)
    }

    async fn send(
        &self,
        request: RequestBuilder,
        kind: ResponseKind,
    ) -> Result<reqwest::Response, ClientError> {
        let request = match &self.credentials.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let outcome = request.send().await;
        if let Ok(response) = &outcome {
            debug!("{} {}", response.status(), response.url());
        }
        self.interceptor.intercept(outcome, kind).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
