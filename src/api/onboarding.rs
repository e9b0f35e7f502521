use crate::client::{ApiClient, ApiError, ApiResponse, RequestDescriptor};
use crate::model::{Ack, OnboardingRecord, OnboardingSubmission};
use crate::types::UserId;

/// `/api/onboarding` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct OnboardingApi<'a> {
    client: &'a ApiClient,
}

impl<'a> OnboardingApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn submit(&self, data: &OnboardingSubmission) -> Result<ApiResponse<Ack>, ApiError> {
        let request = RequestDescriptor::post(&["api", "onboarding"]).with_body(data)?;
        self.client.execute(request).await
    }

    pub async fn get(&self, user_id: &UserId) -> Result<ApiResponse<OnboardingRecord>, ApiError> {
        self.client
            .execute(RequestDescriptor::get(&["api", "onboarding", user_id.as_str()]))
            .await
    }
}
