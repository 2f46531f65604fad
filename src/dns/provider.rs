use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use super::error::DnsResult;

/// A record as sent to the provider when creating it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DnsRecord {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub value: String,
    pub ttl: u32,
    /// Proxy traffic for the record through the ArvanCloud edge
    pub cloud: bool,
}

impl DnsRecord {
    pub fn txt(name: &str, value: &str, ttl: u32) -> Self {
        Self {
            record_type: "TXT".to_string(),
            name: name.to_string(),
            value: value.to_string(),
            ttl,
            cloud: false,
        }
    }

    pub fn with_cloud(mut self, cloud: bool) -> Self {
        self.cloud = cloud;
        self
    }
}

#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Create a record in `domain` and return the provider's response object
    async fn create_record(&self, domain: &str, record: &DnsRecord) -> DnsResult<Map<String, Value>>;

    /// Find the first record matching `name` in `domain` and delete it
    async fn delete_record_by_name(&self, domain: &str, name: &str) -> DnsResult<()>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
