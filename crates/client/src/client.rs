use std::sync::Arc;

use docflow_core::config::ApiConfig;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::envelope::unwrap_response;
use crate::error::ClientError;
use crate::transport::{ApiRequest, ApiResponse, ApiTransport, ReqwestTransport};

/// Shared handle over a transport. Cloning is cheap.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn ApiTransport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new(api.clone())?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// Sends `request` and returns the raw response when it is 2xx.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let method = request.method;
        let path = request.path.clone();
        debug!(event_name = "client.request.sent", method = %method, path = %path, "sending api request");

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(error) => {
                warn!(
                    event_name = "client.request.failed",
                    method = %method,
                    path = %path,
                    error = %error,
                    "api request could not be sent"
                );
                return Err(error.into());
            }
        };

        if !response.is_success() {
            let error = unwrap_response(&response).err().unwrap_or(ClientError::Http {
                status: response.status,
                message: format!("HTTP {}", response.status),
            });
            warn!(
                event_name = "client.request.failed",
                method = %method,
                path = %path,
                status = response.status,
                error = %error,
                "api request was refused"
            );
            return Err(error);
        }

        debug!(
            event_name = "client.request.completed",
            method = %method,
            path = %path,
            status = response.status,
            "api request completed"
        );
        Ok(response)
    }

    /// Sends `request` and unwraps the response envelope.
    pub async fn data(&self, request: ApiRequest) -> Result<Option<Value>, ClientError> {
        let path = request.path.clone();
        let response = self.execute(request).await?;
        unwrap_response(&response).map_err(|error| {
            warn!(event_name = "client.request.failed", path = %path, error = %error, "api call failed");
            error
        })
    }

    /// Like [`ApiClient::data`] but requires a payload and decodes it.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError> {
        let path = request.path.clone();
        let data = self
            .data(request)
            .await?
            .ok_or_else(|| ClientError::Decode(format!("`{path}` returned no data")))?;
        serde_json::from_value(data).map_err(|error| ClientError::Decode(error.to_string()))
    }
}
