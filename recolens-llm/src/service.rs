use async_trait::async_trait;
use crate::error::Result;

#[async_trait]
pub trait RecommendationService: Send + Sync {
    /// Endpoint name for logs
    fn name(&self) -> &str;

    /// Generate recommendations for a user prompt under a system prompt
    async fn generate(&self, user_prompt: &str, system_prompt: &str) -> Result<String>;
}
