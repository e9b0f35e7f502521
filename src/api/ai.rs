use crate::client::{ApiClient, ApiError, ApiResponse, RequestDescriptor};
use crate::model::{ChatRequest, ChatResponse, GenerateContentRequest, GeneratedContent};

/// `/api/ai` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct AiApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AiApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn chat(&self, data: &ChatRequest) -> Result<ApiResponse<ChatResponse>, ApiError> {
        let request = RequestDescriptor::post(&["api", "ai", "chat"]).with_body(data)?;
        self.client.execute(request).await
    }

    pub async fn generate_content(
        &self,
        data: &GenerateContentRequest,
    ) -> Result<ApiResponse<GeneratedContent>, ApiError> {
        let request = RequestDescriptor::post(&["api", "ai", "generate-content"]).with_body(data)?;
        self.client.execute(request).await
    }
}
