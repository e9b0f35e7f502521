use crate::client::{ApiClient, ApiError, ApiResponse, RequestDescriptor};
use crate::model::{ConversationList, MessageList, NewMessage};
use crate::types::ConversationId;
use serde_json::Value;

/// `/api/conversations` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct ConversationApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ConversationApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_conversations(&self) -> Result<ApiResponse<ConversationList>, ApiError> {
        self.client
            .execute(RequestDescriptor::get(&["api", "conversations"]))
            .await
    }

    pub async fn get_messages(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<ApiResponse<MessageList>, ApiError> {
        self.client
            .execute(RequestDescriptor::get(&[
                "api",
                "conversations",
                conversation_id.as_str(),
                "messages",
            ]))
            .await
    }

    /// Post `message` to the thread; the body is `{"message": ...}`.
    pub async fn send_message(
        &self,
        conversation_id: &ConversationId,
        message: impl Into<String>,
    ) -> Result<ApiResponse<Value>, ApiError> {
        let body = NewMessage {
            message: message.into(),
        };
        let request = RequestDescriptor::post(&[
            "api",
            "conversations",
            conversation_id.as_str(),
            "messages",
        ])
        .with_body(&body)?;
        self.client.execute(request).await
    }
}
