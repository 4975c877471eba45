use thiserror::Error;

/// Failures while asking a backend for the dominant colors of one image.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{0}")]
    Service(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected response from analysis service: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failures while constructing an analysis client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(
        "no credentials found: set GOOGLE_CLOUD_VISION_API_KEY or GOOGLE_OAUTH_ACCESS_TOKEN \
         (or pass --api-key / --access-token)"
    )]
    MissingCredentials,

    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}
