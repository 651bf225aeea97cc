//! MX lookups through trust-dns.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::error::ResolveErrorKind;
use trust_dns_resolver::TokioAsyncResolver;

use crate::error::{CollaboratorError, CollaboratorResult};
use crate::traits::mx::MxResolver;

/// Budget for one MX lookup.
pub const DEFAULT_DNS_TIMEOUT: Duration = Duration::from_secs(5);

/// [`MxResolver`] over the system-independent default resolver config.
pub struct DnsMxResolver {
    resolver: TokioAsyncResolver,
    timeout: Duration,
}

impl Default for DnsMxResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DnsMxResolver {
    pub fn new() -> Self {
        Self::with_config(ResolverConfig::default(), ResolverOpts::default())
    }

    pub fn with_config(config: ResolverConfig, opts: ResolverOpts) -> Self {
        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
            timeout: DEFAULT_DNS_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl MxResolver for DnsMxResolver {
    async fn has_mx(&self, domain: &str) -> CollaboratorResult<bool> {
        let lookup = tokio::time::timeout(self.timeout, self.resolver.mx_lookup(domain))
            .await
            .map_err(|_| CollaboratorError::Timeout(self.timeout))?;

        match lookup {
            Ok(records) => {
                let count = records.iter().count();
                debug!(domain, mx_records = count, "MX lookup finished");
                Ok(count > 0)
            }
            Err(e) if matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. }) => {
                debug!(domain, "No MX records");
                Ok(false)
            }
            Err(e) => Err(CollaboratorError::Dns(e.to_string())),
        }
    }
}
