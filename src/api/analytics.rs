use crate::client::{ApiClient, ApiError, ApiResponse, RequestDescriptor};
use crate::model::DashboardData;

/// `/api/analytics` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AnalyticsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_dashboard_data(&self) -> Result<ApiResponse<DashboardData>, ApiError> {
        self.client
            .execute(RequestDescriptor::get(&["api", "analytics", "dashboard"]))
            .await
    }
}
