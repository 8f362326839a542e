use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes HTTP requests for remote record sources.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
