use thiserror::Error;

/// Everything a client call can fail with, spanning the transport and the
/// decoding layer. A single failed attempt is terminal; there are no retries.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// The server answered with a non-200 status.
    #[error("response was not successful (status {0})")]
    ResponseUnsuccessful(u16),
    /// A 200 response with an empty body.
    #[error("no data was received")]
    NoDataReceived,
    /// The body did not match the expected JSON shape.
    #[error("JSON parsing failed: {0}")]
    JsonParsingFailure(#[from] serde_json::Error),
    /// No NASA API key was supplied.
    #[error("no NASA API key configured")]
    InvalidConfiguration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_errors_map_to_json_parsing_failure() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        assert!(matches!(ApiError::from(err), ApiError::JsonParsingFailure(_)));
    }
}
