//! Clipboard access used to copy the event's PIX key.

use crate::error::ClipboardError;
use async_trait::async_trait;

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}
