//! Profile updates for the signed-in user.

use crate::api::ApiClient;
use crate::error::AuthError;
use learnchat_store::AuthSession;
use log::info;
use serde_json::{Value, json};

const PROFILE_PATH: &str = "/auth/me";

/// Client for the `/auth/me` endpoint.
#[derive(Clone)]
pub struct AuthClient {
    api: ApiClient,
    session: AuthSession,
}

impl AuthClient {
    /// Create a client that authenticates with, and updates, `session`.
    pub fn new(api: ApiClient, session: AuthSession) -> Self {
        Self { api, session }
    }

    /// Rename the signed-in user.
    ///
    /// The response object is merged over the cached profile so fields the
    /// endpoint omits (such as `role`) survive. Returns the raw response.
    pub async fn update_profile(&self, name: &str) -> Result<Value, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::NameRequired);
        }
        let mut builder = self
            .api
            .http()
            .put(self.api.url(PROFILE_PATH))
            .timeout(self.api.request_timeout())
            .json(&json!({ "name": name }));
        if let Some(token) = self.session.token()? {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|value| {
                    value
                        .get("message")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or_else(|| status.to_string());
            return Err(AuthError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let data: Value = response.json().await?;
        if data.is_object() {
            let user = self.session.merge_profile(&data)?;
            info!("profile updated (user_id={})", user.id);
        }
        Ok(data)
    }
}
