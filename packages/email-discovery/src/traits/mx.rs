//! DNS MX existence checks.

use async_trait::async_trait;

use crate::error::CollaboratorResult;

#[async_trait]
pub trait MxResolver: Send + Sync {
    /// Whether `domain` publishes at least one MX record.
    ///
    /// "No such domain" and "no records" are `Ok(false)`, not errors.
    async fn has_mx(&self, domain: &str) -> CollaboratorResult<bool>;
}
