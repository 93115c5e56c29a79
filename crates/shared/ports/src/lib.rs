//! Gavel Ports
//!
//! Port definitions (traits) for the Gavel auction client.
//! These define the boundaries between the sync engine and its external
//! collaborators: the wall clock and the REST-shaped backend.

mod backend;
mod clock;
mod error;

pub use backend::BackendApi;
pub use clock::Clock;
pub use error::{ApiError, ApiResult};
