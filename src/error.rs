use thiserror::Error;

use crate::validation::ValidationError;

/// Failure of a single provider HTTP exchange.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection timeout: {0}")]
    Timeout(String),
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid API client response (status_code={status}, data={body})")]
    BadResponseCode { status: u16, body: String },
    #[error(
        "Invalid API client response (status_code={status}, payload_status_code={payload_code}, data={body})"
    )]
    BadPayloadCode {
        status: u16,
        payload_code: i64,
        body: String,
    },
    #[error("Invalid response envelope: {0}")]
    InvalidEnvelope(String),
}

impl GatewayError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GatewayError::BadResponseCode { status, .. } | GatewayError::BadPayloadCode { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    pub fn payload_code(&self) -> Option<i64> {
        match self {
            GatewayError::BadPayloadCode { payload_code, .. } => Some(*payload_code),
            _ => None,
        }
    }
}

/// The three error kinds every caller sees, whatever the provider.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{context}. Error: {source}")]
    Provider {
        context: String,
        #[source]
        source: GatewayError,
    },
    #[error("{0}")]
    InvalidResponse(String),
    #[error("{0}")]
    InvalidInput(String),
}

impl ClientError {
    pub fn provider(context: impl Into<String>, source: GatewayError) -> Self {
        ClientError::Provider {
            context: context.into(),
            source,
        }
    }

    pub fn invalid_response(context: impl Into<String>, error: ValidationError) -> Self {
        ClientError::InvalidResponse(format!("{} is not valid: {}", context.into(), error))
    }

    pub fn invalid_input(context: impl Into<String>, error: ValidationError) -> Self {
        ClientError::InvalidInput(format!("Failed to validate {}: {}", context.into(), error))
    }
}
