use crate::client::{ApiClient, ApiError, ApiResponse, RequestDescriptor};
use crate::model::{AuthResponse, SigninRequest, SignupRequest, UserResponse};

/// `/api/auth` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn signup(&self, data: &SignupRequest) -> Result<ApiResponse<AuthResponse>, ApiError> {
        let request = RequestDescriptor::post(&["api", "auth", "signup"]).with_body(data)?;
        self.client.execute(request).await
    }

    pub async fn signin(&self, data: &SigninRequest) -> Result<ApiResponse<AuthResponse>, ApiError> {
        let request = RequestDescriptor::post(&["api", "auth", "signin"]).with_body(data)?;
        self.client.execute(request).await
    }

    /// Profile of whoever the stored token belongs to.
    pub async fn get_current_user(&self) -> Result<ApiResponse<UserResponse>, ApiError> {
        self.client
            .execute(RequestDescriptor::get(&["api", "auth", "me"]))
            .await
    }
}
