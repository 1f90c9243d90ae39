//! Wire types for the mobile API.
//!
//! Every call is a POST of `{functionName, payload, reference}` and every
//! answer is `{statusCode, message, data}`. `data` varies per function, so it
//! stays a raw JSON value here and is validated into a concrete type at the
//! boundary with [`ApiResponse::into_data`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::client::ApiError;
use super::routing::EndpointType;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope {
    pub function_name: String,
    pub payload: Value,
    pub reference: String,
}

/// A single mobile API call before it is put on the wire.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub function_name: String,
    pub payload: Value,
    pub reference: Option<String>,
    pub api_key: Option<String>,
    pub endpoint_type: EndpointType,
}

impl ApiRequest {
    pub fn new(function_name: impl Into<String>, payload: Value) -> Self {
        Self {
            function_name: function_name.into(),
            payload,
            reference: None,
            api_key: None,
            endpoint_type: EndpointType::App,
        }
    }

    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn endpoint_type(mut self, endpoint_type: EndpointType) -> Self {
        self.endpoint_type = endpoint_type;
        self
    }

    /// Builds the wire envelope. A missing reference gets a fresh UUID.
    pub fn envelope(&self) -> ApiEnvelope {
        ApiEnvelope {
            function_name: self.function_name.clone(),
            payload: self.payload.clone(),
            reference: self
                .reference
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawResponse {
    pub status_code: Option<u16>,
    pub message: Option<String>,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub message: Option<String>,
    pub data: Value,
}

impl ApiResponse {
    pub(crate) fn from_raw(raw: RawResponse, http_status: u16) -> Self {
        Self {
            status_code: raw.status_code.unwrap_or(http_status),
            message: raw.message,
            data: raw.data,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Fails with [`ApiError::Rejected`] unless the backend reported success.
    pub fn ensure_success(self) -> Result<Self, ApiError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::Rejected {
                status: self.status_code,
                message: self.message_or("Request failed"),
            })
        }
    }

    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let response = self.ensure_success()?;
        serde_json::from_value(response.data).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}
