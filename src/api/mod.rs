//! Endpoint groups of the workflow backend.
//!
//! Each group borrows the shared [`ApiClient`] and exposes one async method
//! per backend operation. A method issues exactly one HTTP request and
//! resolves to the decoded response or an [`ApiError`](crate::ApiError);
//! there is no retrying, caching or local validation.
//!
//! ```ignore
//! let client = ApiClient::new(ClientConfig::from_env()?, store)?;
//! let users = client.admin().get_users(&UserListParams::page(2)).await?;
//! client
//!     .conversation()
//!     .send_message(&ConversationId::new("c1"), "hi")
//!     .await?;
//! ```

mod admin;
mod ai;
mod analytics;
mod auth;
mod conversation;
mod onboarding;
mod social_media;


pub use admin::AdminApi;
pub use ai::AiApi;
pub use analytics::AnalyticsApi;
pub use auth::AuthApi;
pub use conversation::ConversationApi;
pub use onboarding::OnboardingApi;
pub use social_media::SocialMediaApi;

use crate::client::ApiClient;

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn onboarding(&self) -> OnboardingApi<'_> {
        OnboardingApi::new(self)
    }

    pub fn ai(&self) -> AiApi<'_> {
        AiApi::new(self)
    }

    pub fn social_media(&self) -> SocialMediaApi<'_> {
        SocialMediaApi::new(self)
    }

    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi::new(self)
    }

    pub fn analytics(&self) -> AnalyticsApi<'_> {
        AnalyticsApi::new(self)
    }

    pub fn conversation(&self) -> ConversationApi<'_> {
        ConversationApi::new(self)
    }
}
