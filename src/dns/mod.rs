mod arvancloud;
mod error;
mod provider;

pub use arvancloud::{ArvanCloudClient, ARVANCLOUD_API_ENDPOINT};
pub use error::{ArvanCloudError, DnsResult, InvalidToken, ResponseProblem};
pub use provider::{DnsProvider, DnsRecord};
