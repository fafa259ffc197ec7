use async_trait::async_trait;

use crate::domain::Candidate;

/// Source of newly listed tokens.
///
/// `fetch` never fails past this boundary: adapters log their own errors and
/// hand back an empty batch, so a bad cycle only means "nothing new".
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Fetch the latest batch of candidates, newest first
    async fn fetch(&self) -> Vec<Candidate>;

    /// Short label for logs
    fn label(&self) -> &'static str;
}
