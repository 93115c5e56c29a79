use thiserror::Error;

/// Failures reported by the backend collaborator
///
/// `Conflict` is the one the bidder cares about: the server rejected a bid
/// because a concurrent higher bid won the race. Everything else is generic
/// command failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("bid conflict: a higher bid already exists")]
    Conflict,

    #[error("not authenticated")]
    Unauthorized,

    #[error("request failed with status {0}")]
    Status(u16),

    #[error("transport failure: {0}")]
    Transport(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
