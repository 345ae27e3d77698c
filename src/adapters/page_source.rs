use crate::domain::ports::Fetcher;
use crate::utils::error::Result;

/// Loads a host page either over HTTP or from a local file.
pub async fn load_page<F: Fetcher + ?Sized>(source: &str, fetcher: &F) -> Result<String> {
    if source.starts_with("http://") || source.starts_with("https://") {
        tracing::debug!("Fetching host page {}", source);
        fetcher.fetch(source).await
    } else {
        tracing::debug!("Reading host page from {}", source);
        Ok(tokio::fs::read_to_string(source).await?)
    }
}
