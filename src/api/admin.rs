use crate::client::{ApiClient, ApiError, ApiResponse, RequestDescriptor};
use crate::model::{
    Ack, AdminStats, CreateUserRequest, OnboardingListParams, OnboardingOverview,
    ResetPasswordRequest, UpdateUserRequest, UserList, UserListParams, UserResponse,
};
use crate::types::UserId;

/// `/api/admin` endpoints. The backend rejects these for non-admin tokens.
#[derive(Debug, Clone, Copy)]
pub struct AdminApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AdminApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_users(&self, params: &UserListParams) -> Result<ApiResponse<UserList>, ApiError> {
        let request = RequestDescriptor::get(&["api", "admin", "users"]).with_query(params)?;
        self.client.execute(request).await
    }

    pub async fn get_stats(&self) -> Result<ApiResponse<AdminStats>, ApiError> {
        self.client
            .execute(RequestDescriptor::get(&["api", "admin", "stats"]))
            .await
    }

    pub async fn get_onboarding_data(
        &self,
        params: &OnboardingListParams,
    ) -> Result<ApiResponse<OnboardingOverview>, ApiError> {
        let request = RequestDescriptor::get(&["api", "admin", "onboarding"]).with_query(params)?;
        self.client.execute(request).await
    }

    pub async fn update_user(
        &self,
        user_id: &UserId,
        data: &UpdateUserRequest,
    ) -> Result<ApiResponse<Ack>, ApiError> {
        let request =
            RequestDescriptor::put(&["api", "admin", "users", user_id.as_str()]).with_body(data)?;
        self.client.execute(request).await
    }

    pub async fn delete_user(&self, user_id: &UserId) -> Result<ApiResponse<Ack>, ApiError> {
        self.client
            .execute(RequestDescriptor::delete(&["api", "admin", "users", user_id.as_str()]))
            .await
    }

    pub async fn create_user(
        &self,
        data: &CreateUserRequest,
    ) -> Result<ApiResponse<UserResponse>, ApiError> {
        let request = RequestDescriptor::post(&["api", "admin", "users"]).with_body(data)?;
        self.client.execute(request).await
    }

    pub async fn reset_password(
        &self,
        user_id: &UserId,
        data: &ResetPasswordRequest,
    ) -> Result<ApiResponse<Ack>, ApiError> {
        let request = RequestDescriptor::post(&[
            "api",
            "admin",
            "users",
            user_id.as_str(),
            "reset-password",
        ])
        .with_body(data)?;
        self.client.execute(request).await
    }
}
