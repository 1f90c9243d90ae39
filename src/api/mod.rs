pub mod client;
pub mod envelope;
pub mod routing;
pub mod scope;

pub use client::{ApiError, MobileApiClient};
pub use envelope::{ApiEnvelope, ApiRequest, ApiResponse};
pub use routing::{select_domain, Domain, EndpointType};
pub use scope::{RequestScope, ScopeHandle};
