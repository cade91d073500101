//! Usage data: fetch the OAuth usage endpoint and parse its JSON response.
//!
//! The fetcher returns the raw response body so callers can cache it
//! verbatim; [`parse_usage_response`] turns a body into a [`UsageSnapshot`].

pub mod credentials;
pub mod fetcher;
pub mod parser;
pub mod types;

pub use credentials::{default_credentials_path, read_access_token};
pub use fetcher::{HttpUsageSource, UsageSource, DEFAULT_ENDPOINT, DEFAULT_FETCH_TIMEOUT};
pub use parser::parse_usage_response;
pub use types::{QuotaWindow, UsageSnapshot, UsageWindowRaw, WindowKind};
