use http::StatusCode;

/// Failure to obtain a bearer-token HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum TokenClientError {
    #[error("no UAA service is bound, cannot request a token for client '{client_id}'")]
    NotBound { client_id: String },

    #[error("{0}")]
    InvalidIssuer(String),

    #[error("Could not get token: {0}")]
    Token(#[from] assetkit_auth::TokenError),

    #[error("Could not build HTTP client: {0}")]
    Client(String),
}

/// Failures of UAA client management calls.
#[derive(Debug, thiserror::Error)]
pub enum UaaClientError {
    #[error("Failed to get admin UAA client: {0}")]
    AdminClient(#[source] TokenClientError),

    #[error("Could not create Http request: {0}")]
    Request(String),

    #[error("Failed to perform http {method}: {reason}")]
    Transport { method: &'static str, reason: String },

    #[error("Could not read response from Uaa: {0}")]
    BodyRead(String),

    #[error("Did not receive 201 response when creating new UAA client: {}", .0.as_u16())]
    UnexpectedCreateStatus(StatusCode),

    #[error(
        "Did not receive 200 or 404 response when deleting existing UAA client: {}",
        .0.as_u16()
    )]
    UnexpectedDeleteStatus(StatusCode),
}

/// Failures talking to the asset service.
#[derive(Debug, thiserror::Error)]
pub enum AssetGatewayError {
    #[error("Could not create Asset request: {0}")]
    Request(String),

    #[error("{0}")]
    Transport(String),

    #[error("Asset service rejected the request with HTTP {}: {body}", .status.as_u16())]
    UpstreamRejected { status: StatusCode, body: String },

    #[error("Failed to read Asset response body: {0}")]
    BodyRead(String),

    #[error("Failed to decode Asset response body: {0}")]
    Decode(#[source] serde_json::Error),
}

/// The step of the `/ping` workflow that failed, with its cause.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Whoops... could not clean up Uaa client: {0}")]
    Cleanup(#[source] UaaClientError),

    #[error("Whoops... could not create the Uaa client: {0}")]
    Registration(#[source] UaaClientError),

    #[error("Cannot generate HttpClient: {0}")]
    Client(#[source] TokenClientError),

    #[error("Failed to post to Asset: {0}")]
    Post(#[source] AssetGatewayError),

    #[error("Failed to get Asset: {0}")]
    Query(#[source] AssetGatewayError),
}
