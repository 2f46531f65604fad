use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::config::Settings;
use crate::dns::{ArvanCloudError, DnsProvider, DnsRecord, DnsResult};

pub const ACME_CHALLENGE_LABEL: &str = "_acme-challenge";

/// One DNS-01 challenge handed over by the ACME client
#[derive(Debug, Clone, PartialEq)]
pub struct Dns01Challenge {
    pub domain: String,
    /// `_acme-challenge.<domain>`
    pub validation_name: String,
    /// TXT record content expected by the CA
    pub validation: String,
}

impl Dns01Challenge {
    pub fn new(domain: &str, validation: &str) -> Self {
        let domain = domain.strip_prefix("*.").unwrap_or(domain);

        Self {
            domain: domain.to_string(),
            validation_name: format!("{}.{}", ACME_CHALLENGE_LABEL, domain),
            validation: validation.to_string(),
        }
    }

    /// Fully qualified name as sent to the provider
    pub fn record_name(&self) -> String {
        format!("{}.", self.validation_name)
    }
}

#[derive(Debug, Clone)]
pub struct AuthenticatorConfig {
    pub ttl: u32,
    pub cloud: bool,
    pub propagation: Duration,
}

impl From<&Settings> for AuthenticatorConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            ttl: settings.record.ttl,
            cloud: settings.record.cloud,
            propagation: Duration::from_secs(settings.plugin.propagation_seconds),
        }
    }
}

pub struct Authenticator<P> {
    provider: P,
    config: AuthenticatorConfig,
}

impl<P: DnsProvider> Authenticator<P> {
    pub fn new(provider: P, config: AuthenticatorConfig) -> Self {
        Self { provider, config }
    }

    /// Publish a TXT record per challenge, then wait for propagation
    pub async fn perform(&self, challenges: &[Dns01Challenge]) -> DnsResult<()> {
        for challenge in challenges {
            let record = DnsRecord::txt(
                &challenge.record_name(),
                &challenge.validation,
                self.config.ttl,
            )
            .with_cloud(self.config.cloud);

            info!(
                "Adding {} record for {} via {}",
                record.name,
                challenge.domain,
                self.provider.provider_name()
            );

            let created = self.provider.create_record(&challenge.domain, &record).await?;
            debug!("Provider returned {:?}", created);
        }

        if !challenges.is_empty() && !self.config.propagation.is_zero() {
            info!(
                "Waiting {} seconds for DNS changes to propagate",
                self.config.propagation.as_secs()
            );
            tokio::time::sleep(self.config.propagation).await;
        }

        Ok(())
    }

    /// Remove the challenge records. Every challenge is attempted; the first
    /// failure is returned after the loop.
    pub async fn cleanup(&self, challenges: &[Dns01Challenge]) -> DnsResult<()> {
        let mut first_error = None;

        for challenge in challenges {
            let name = challenge.record_name();

            match self
                .provider
                .delete_record_by_name(&challenge.domain, &name)
                .await
            {
                Ok(()) => info!("Removed {} record for {}", name, challenge.domain),
                Err(ArvanCloudError::RecordNotFound { .. }) => {
                    warn!("No {} record found for {}, nothing to clean up", name, challenge.domain);
                }
                Err(e) => {
                    error!("Failed to remove {} for {}: {}", name, challenge.domain, e);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
