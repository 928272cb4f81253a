//! Live-flag store backed by the account service's REST API.

use async_trait::async_trait;
use omega_common::{AccountId, StoreError};
use omega_config::StoreConfig;
use tracing::debug;

use super::store::LiveStatusStore;

/// Writes `PATCH {base_url}/users/{account}` with `{"isLive": ..}`.
pub struct HttpLiveStore {
    http: reqwest::Client,
    base_url: reqwest::Url,
    api_key: Option<String>,
}

impl HttpLiveStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let raw = config
            .base_url
            .as_deref()
            .ok_or_else(|| StoreError::InvalidUrl("store.base_url is not set".into()))?;
        let base_url =
            reqwest::Url::parse(raw).map_err(|e| StoreError::InvalidUrl(format!("{raw}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::InvalidUrl(format!("{raw}: cannot be a base")));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(config.timeout_secs.min(10)))
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Account ids are pushed as an encoded path segment, never parsed as a path.
    pub(crate) fn account_url(&self, account: &AccountId) -> Result<reqwest::Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("users")
            .push(account.as_str());
        Ok(url)
    }
}

#[async_trait]
impl LiveStatusStore for HttpLiveStore {
    async fn set_live(&self, account: &AccountId, live: bool) -> Result<(), StoreError> {
        let url = self.account_url(account)?;
        let body = serde_json::json!({
            "isLive": live,
            "lastActive": chrono::Utc::now().to_rfc3339(),
        });

        debug!(account = %account, live, "Store live flag update");

        let mut request = self.http.patch(url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                account: account.to_string(),
            });
        }
        Ok(())
    }
}
