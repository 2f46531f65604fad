use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::error::{ArvanCloudError, DnsResult, InvalidToken, ResponseProblem};
use super::provider::{DnsProvider, DnsRecord};

pub const ARVANCLOUD_API_ENDPOINT: &str = "https://napi.arvancloud.com/cdn/4.0/domains";

/// Client for the record endpoints of the ArvanCloud CDN DNS API.
///
/// Holds nothing but the token and the HTTP client; every call goes to the API.
#[derive(Debug, Clone)]
pub struct ArvanCloudClient {
    client: Client,
    token: HeaderValue,
    base_url: String,
}

impl ArvanCloudClient {
    /// API key from https://npanel.arvancloud.com/profile/api-keys, sent as-is
    pub fn new(token: &str) -> Result<Self, InvalidToken> {
        let mut token = HeaderValue::from_str(token).map_err(|_| InvalidToken)?;
        token.set_sensitive(true);

        Ok(Self {
            client: Client::new(),
            token,
            base_url: ARVANCLOUD_API_ENDPOINT.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Use a preconfigured HTTP client, e.g. one with a request timeout
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, self.token.clone());
        headers
    }

    fn records_url(&self, domain: &str) -> String {
        format!("{}/{}/dns-records", self.base_url, domain)
    }

    /// Create `record` in `domain` and return the response object unmodified
    pub async fn create_record(
        &self,
        domain: &str,
        record: &DnsRecord,
    ) -> DnsResult<Map<String, Value>> {
        debug!(
            "Creating {} record {} in {}",
            record.record_type, record.name, domain
        );

        let response = self
            .client
            .post(self.records_url(domain))
            .headers(self.headers())
            .json(record)
            .send()
            .await?;

        let created = json_body(response).await?;
        info!("Created {} record {} in {}", record.record_type, record.name, domain);
        Ok(created)
    }

    /// Delete the first record the provider's search returns for `name`
    pub async fn delete_record_by_name(&self, domain: &str, name: &str) -> DnsResult<()> {
        let record_id = self.find_record_id(domain, name).await?;
        self.delete_record(domain, &record_id).await
    }

    pub async fn delete_record(&self, domain: &str, record_id: &str) -> DnsResult<()> {
        let url = format!("{}/{}", self.records_url(domain), record_id);
        debug!("Deleting record {} in {}", record_id, domain);

        let response = self
            .client
            .delete(&url)
            .headers(self.headers())
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(ArvanCloudError::Unauthorized),
            StatusCode::OK => {
                info!("Deleted record {} in {}", record_id, domain);
                Ok(())
            }
            status => Err(ResponseProblem::UnexpectedStatus(status).into()),
        }
    }

    /// The search is fuzzy on the provider side; the first hit is taken as is
    async fn find_record_id(&self, domain: &str, name: &str) -> DnsResult<String> {
        debug!("Searching records named {} in {}", name, domain);

        let response = self
            .client
            .get(self.records_url(domain))
            .query(&[("search", name)])
            .headers(self.headers())
            .send()
            .await?;

        let body: Value = json_body(response).await?;
        let records = body
            .get("data")
            .and_then(Value::as_array)
            .ok_or(ResponseProblem::MissingField("data"))?;

        match records.first() {
            Some(record) => record_id(record),
            None => Err(ArvanCloudError::RecordNotFound {
                record_name: name.to_string(),
            }),
        }
    }
}

fn check_status(status: StatusCode) -> DnsResult<()> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(ArvanCloudError::Unauthorized);
    }
    if !status.is_success() {
        return Err(ResponseProblem::UnexpectedStatus(status).into());
    }
    Ok(())
}

async fn json_body<T: DeserializeOwned>(response: Response) -> DnsResult<T> {
    check_status(response.status())?;

    let body = response.bytes().await?;
    let parsed = serde_json::from_slice(&body).map_err(ResponseProblem::InvalidJson)?;
    Ok(parsed)
}

// ids come back as strings or numbers depending on the API version
fn record_id(record: &Value) -> DnsResult<String> {
    match record.get("id") {
        Some(Value::String(id)) => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        _ => Err(ResponseProblem::MissingField("id").into()),
    }
}

#[async_trait]
impl DnsProvider for ArvanCloudClient {
    async fn create_record(
        &self,
        domain: &str,
        record: &DnsRecord,
    ) -> DnsResult<Map<String, Value>> {
        ArvanCloudClient::create_record(self, domain, record).await
    }

    async fn delete_record_by_name(&self, domain: &str, name: &str) -> DnsResult<()> {
        ArvanCloudClient::delete_record_by_name(self, domain, name).await
    }

    fn provider_name(&self) -> &'static str {
        "arvancloud"
    }
}
