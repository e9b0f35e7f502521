use crate::client::{ApiClient, ApiError, ApiResponse, RequestDescriptor};
use crate::model::{AccountList, Ack, FacebookAuthUrl, SocialMessageRequest};
use crate::types::AccountId;

/// Connected social accounts and outbound messaging.
#[derive(Debug, Clone, Copy)]
pub struct SocialMediaApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SocialMediaApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// URL that starts the Facebook OAuth flow. Lives under `/api/auth`.
    pub async fn get_facebook_auth_url(&self) -> Result<ApiResponse<FacebookAuthUrl>, ApiError> {
        self.client
            .execute(RequestDescriptor::get(&["api", "auth", "facebook"]))
            .await
    }

    pub async fn get_accounts(&self) -> Result<ApiResponse<AccountList>, ApiError> {
        self.client
            .execute(RequestDescriptor::get(&["api", "social-media", "accounts"]))
            .await
    }

    pub async fn disconnect_account(
        &self,
        account_id: &AccountId,
    ) -> Result<ApiResponse<Ack>, ApiError> {
        self.client
            .execute(RequestDescriptor::delete(&[
                "api",
                "social-media",
                "accounts",
                account_id.as_str(),
            ]))
            .await
    }

    pub async fn send_facebook_message(
        &self,
        data: &SocialMessageRequest,
    ) -> Result<ApiResponse<Ack>, ApiError> {
        let request =
            RequestDescriptor::post(&["api", "social-media", "facebook", "message"]).with_body(data)?;
        self.client.execute(request).await
    }

    pub async fn send_instagram_message(
        &self,
        data: &SocialMessageRequest,
    ) -> Result<ApiResponse<Ack>, ApiError> {
        let request =
            RequestDescriptor::post(&["api", "social-media", "instagram", "message"]).with_body(data)?;
        self.client.execute(request).await
    }
}
