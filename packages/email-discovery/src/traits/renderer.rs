//! Headless-browser rendering, used only after an anti-bot challenge.

use async_trait::async_trait;

use crate::error::CollaboratorResult;

#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Render `url` in a real browser and return the final HTML, if any.
    async fn render_page(&self, url: &str) -> CollaboratorResult<Option<String>>;
}
