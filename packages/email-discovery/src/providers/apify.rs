//! Headless rendering through the Apify web-scraper actor.

use std::time::Duration;

use apify_client::{ApifyClient, ABORT_TIMEOUT};
use async_trait::async_trait;
use tracing::debug;

use crate::error::CollaboratorResult;
use crate::security::{ExposeSecret, SecretString};
use crate::traits::renderer::PageRenderer;

/// [`PageRenderer`] backed by an Apify actor run.
pub struct ApifyRenderer {
    client: ApifyClient,
}

impl ApifyRenderer {
    /// `render_timeout` is the caller's budget; the client gets a shorter one
    /// so it can abort the run before the caller gives up on it.
    pub fn new(token: &SecretString, render_timeout: Duration) -> Self {
        Self {
            client: ApifyClient::new(token.expose_secret().to_string())
                .with_render_timeout(client_budget(render_timeout)),
        }
    }

    /// Wrap an already configured client.
    pub fn with_client(client: ApifyClient) -> Self {
        Self { client }
    }
}

fn client_budget(render_timeout: Duration) -> Duration {
    render_timeout
        .saturating_sub(ABORT_TIMEOUT)
        .max(render_timeout / 2)
}

#[async_trait]
impl PageRenderer for ApifyRenderer {
    async fn render_page(&self, url: &str) -> CollaboratorResult<Option<String>> {
        debug!(url = %url, "Rendering page via Apify");
        Ok(self.client.render_page(url).await?)
    }
}
