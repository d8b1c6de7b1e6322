use thiserror::Error;

/// Failures talking to an upstream HTTP API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned status {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub(crate) fn http(endpoint: &str, source: reqwest::Error) -> Self {
        ApiError::Http {
            endpoint: endpoint.to_string(),
            source,
        }
    }

    pub(crate) fn decode(endpoint: &str, source: serde_json::Error) -> Self {
        ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        }
    }
}

/// Read a blocking response body, turning non-2xx statuses into errors
pub(crate) fn read_success_body(
    endpoint: &str,
    response: reqwest::blocking::Response,
) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().map_err(|e| ApiError::http(endpoint, e))?;

    if !status.is_success() {
        return Err(ApiError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}
